use sqlx::Row;

use qcars_core::domain::discount::{DiscountRule, DiscountRuleId};

use super::{decode_err, parse_decimal, DiscountRuleRepository, RepositoryError};
use crate::DbPool;

pub struct SqlDiscountRuleRepository {
    pool: DbPool,
}

impl SqlDiscountRuleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_rule(row: &sqlx::sqlite::SqliteRow) -> Result<DiscountRule, RepositoryError> {
    let min_days: i64 = row.try_get("min_days").map_err(decode_err)?;
    let percentage_off: String = row.try_get("percentage_off").map_err(decode_err)?;
    Ok(DiscountRule {
        id: DiscountRuleId(row.try_get("id").map_err(decode_err)?),
        min_days: u32::try_from(min_days).map_err(decode_err)?,
        percentage_off: parse_decimal("discount_rules.percentage_off", &percentage_off)?,
        label: row.try_get("label").map_err(decode_err)?,
        label_ar: row.try_get("label_ar").map_err(decode_err)?,
    })
}

#[async_trait::async_trait]
impl DiscountRuleRepository for SqlDiscountRuleRepository {
    async fn list(&self) -> Result<Vec<DiscountRule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, min_days, percentage_off, label, label_ar
             FROM discount_rules ORDER BY min_days ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_rule).collect()
    }

    async fn add(&self, rule: DiscountRule) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO discount_rules (id, min_days, percentage_off, label, label_ar)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 min_days = excluded.min_days,
                 percentage_off = excluded.percentage_off,
                 label = excluded.label,
                 label_ar = excluded.label_ar",
        )
        .bind(&rule.id.0)
        .bind(i64::from(rule.min_days))
        .bind(rule.percentage_off.to_string())
        .bind(&rule.label)
        .bind(&rule.label_ar)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &DiscountRuleId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM discount_rules WHERE id = ?")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use qcars_core::domain::discount::{DiscountRule, DiscountRuleId};

    use super::SqlDiscountRuleRepository;
    use crate::repositories::DiscountRuleRepository;
    use crate::{connect_with_settings, migrations};

    fn rule(id: &str, min_days: u32, pct: i64) -> DiscountRule {
        DiscountRule {
            id: DiscountRuleId(id.to_string()),
            min_days,
            percentage_off: Decimal::new(pct, 2),
            label: format!("{min_days}+ days"),
            label_ar: None,
        }
    }

    #[tokio::test]
    async fn rules_are_listed_ascending_by_min_days() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        let repo = SqlDiscountRuleRepository::new(pool);

        repo.add(rule("month", 30, 25)).await.expect("add month");
        repo.add(rule("short", 3, 5)).await.expect("add short");
        repo.add(rule("week", 7, 10)).await.expect("add week");

        let listed = repo.list().await.expect("list");
        let thresholds: Vec<u32> = listed.iter().map(|rule| rule.min_days).collect();

        assert_eq!(thresholds, vec![3, 7, 30]);
        assert_eq!(listed[2].percentage_off, Decimal::new(25, 2));

        assert!(repo.delete(&DiscountRuleId("week".to_string())).await.expect("delete"));
        assert_eq!(repo.list().await.expect("list").len(), 2);
    }
}
