use serde::Deserialize;

/// One row of the event stream, as typed into the UI forms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventEntry {
    pub action: EventType,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Login,
    Transfer,
    Loan,
    Close,
    Sort,
    Wait,
}
