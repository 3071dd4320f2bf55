use serde::{Deserialize, Serialize};

/// `null` and a missing key both read as empty.
#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<ChatMessage>>,
}

#[derive(Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ChatMessage {
    pub fn sender(&self) -> &str {
        self.sender.as_deref().unwrap_or("user")
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// One self-reported mood entry. `timestamp` is epoch milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessCheckIn {
    pub mood_rating: i64,
    pub mood_description: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub voice_url: Option<String>,
    pub timestamp: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

#[derive(Serialize)]
pub struct CheckInReceipt {
    pub message: &'static str,
    pub data: WellnessCheckIn,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Therapist {
    pub id: u32,
    pub name: &'static str,
    pub specialty: &'static str,
    pub location: &'static str,
    pub availability: &'static str,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub id: Option<u32>,
    pub name: String,
    pub phone: String,
    pub datetime: String,
    pub concern: String,
    pub therapist_id: u32,
    pub therapist_name: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "upcoming".to_string()
}

#[derive(Serialize)]
pub struct BookingReceipt {
    pub message: &'static str,
    pub appointment: Appointment,
}

#[derive(Deserialize)]
pub struct MoodRequest {
    pub user_mood: String,
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub detected_mood: String,
    pub videos: Vec<String>,
    pub articles: Vec<String>,
    pub product: String,
}
