use std::sync::Arc;
use std::time::Duration;

use qcars_core::domain::vehicle::{Vehicle, VehicleId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::llm::{CompletionRequest, LlmClient};

pub const FALLBACK_MESSAGE: &str = "I'm having a little trouble connecting to my brain right now. Please browse our collection manually!";

/// Parsed assistant reply. Ids are passed through as returned, unknown ones
/// simply never match a catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Recommendation {
    pub recommended_car_ids: Vec<VehicleId>,
    pub message: String,
}

impl Recommendation {
    pub fn fallback() -> Self {
        Self { recommended_car_ids: Vec::new(), message: FALLBACK_MESSAGE.to_string() }
    }

    pub fn is_fallback(&self) -> bool {
        self.recommended_car_ids.is_empty() && self.message == FALLBACK_MESSAGE
    }
}

pub struct RecommendationService {
    client: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl RecommendationService {
    pub fn new(client: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Never fails. Transport errors, timeouts and replies that do not match
    /// the schema all collapse into [`Recommendation::fallback`].
    pub async fn recommend(&self, prompt: &str, catalog: &[Vehicle]) -> Recommendation {
        let request = CompletionRequest {
            system_instruction: build_system_instruction(catalog),
            prompt: prompt.to_string(),
            response_schema: response_schema(),
        };

        let outcome = match tokio::time::timeout(self.timeout, self.client.complete(&request)).await
        {
            Ok(Ok(text)) => parse_response(&text),
            Ok(Err(error)) => Err(format!("{error:#}")),
            Err(_) => Err(format!("no reply within {}s", self.timeout.as_secs_f32())),
        };

        match outcome {
            Ok(recommendation) => {
                info!(
                    event_name = "recommendation.completed",
                    recommended = recommendation.recommended_car_ids.len(),
                    "recommendation received"
                );
                recommendation
            }
            Err(error) => {
                warn!(
                    event_name = "recommendation.fallback",
                    error = %error,
                    "recommendation failed, returning fallback"
                );
                Recommendation::fallback()
            }
        }
    }
}

pub fn parse_response(text: &str) -> Result<Recommendation, String> {
    serde_json::from_str::<Recommendation>(text.trim())
        .map_err(|error| format!("malformed recommendation payload: {error}"))
}

pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recommendedCarIds": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of car IDs from the inventory that match the user request."
            },
            "message": {
                "type": "string",
                "description": "A helpful message explaining the recommendation to the user."
            }
        },
        "required": ["recommendedCarIds", "message"]
    })
}

/// Describes the assistant's role and the current inventory, one car per line.
pub fn build_system_instruction(catalog: &[Vehicle]) -> String {
    let mut instruction = String::from(
        "You are Q-Bot, the rental assistant of a premium car rental company. \
         Recommend cars from the inventory below that fit the customer's trip. \
         Only use ids that appear in the inventory and prefer available cars. \
         Reply with JSON containing `recommendedCarIds` and a short friendly `message`.\n\n\
         Inventory:\n",
    );
    for vehicle in catalog {
        instruction.push_str(&format!(
            "- id: {} | {} {} {} | type: {} | seats: {} | {} per day | {}\n",
            vehicle.id.0,
            vehicle.year,
            vehicle.brand,
            vehicle.name,
            vehicle.vehicle_type.as_str(),
            vehicle.seats,
            vehicle.price_per_day,
            if vehicle.is_available { "available" } else { "unavailable" },
        ));
    }
    instruction
}
