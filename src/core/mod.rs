// Domain-layer modules and shared errors/models
pub mod risk {
    pub use crate::risk::*;
}

pub mod ledger {
    pub use crate::ledger::*;
}

pub mod validation {
    pub use crate::validation::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
