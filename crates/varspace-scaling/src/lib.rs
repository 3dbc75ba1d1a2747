#![deny(missing_docs)]
#![doc = "Built-in data-scaling variants and the scaler choice composed from them."]

mod choice;
pub mod scalers;

pub use choice::{
    add_scaler, builtin_scalers, scaler_policy, scaler_registry, ScalerChoice, NO_SCALER,
    SCALER_PREFERENCE,
};
pub use scalers::BuiltinScaler;
