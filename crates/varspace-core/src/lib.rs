#![deny(missing_docs)]
#![doc = "Core error, value and dataset-property types for the varspace engine."]

pub mod dataset;
pub mod errors;
mod value;

pub use dataset::{
    check_dataset_properties, DatasetProperties, CATEGORICAL_COLUMNS, IS_SPARSE,
    NUMERICAL_COLUMNS,
};
pub use errors::{ErrorInfo, Result, VarspaceError};
pub use value::ParamValue;
