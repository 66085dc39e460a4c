// Domain-layer modules and shared errors/models
pub mod assessment {
    pub use crate::assessment::*;
}

pub mod display {
    pub use crate::display::*;
}

pub mod eligibility {
    pub use crate::eligibility::*;
}

pub mod errors {
    pub use crate::errors::*;
}

pub mod models {
    pub use crate::models::*;
}
