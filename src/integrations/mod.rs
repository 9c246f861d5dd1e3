//! External service integrations.

pub mod rpc_client {
    pub use crate::rpc_client::*;
}

pub mod telegram_client {
    pub use crate::telegram_client::*;
}

pub mod telegram_models {
    pub use crate::telegram_models::*;
}

pub mod risk_api_client {
    pub use crate::risk_api_client::*;
}
