//! Response bodies for write and login endpoints. Reads return the raw
//! records; writes return a message envelope.

use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: &str) -> Self {
        MessageBody {
            message: message.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct LoginBody {
    pub message: String,
    pub user: Value,
}
