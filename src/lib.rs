pub mod codec;
pub mod config;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use codec::parcel::Parcel;
pub use config::{EmptyGroupPolicy, ParserConfig, RegistryConfig, ValidationConfig};
pub use domain::model::{is_valid_category, AidGroup, Category, CategorySet, MAX_NUM_AIDS};
pub use domain::ports::{AidGroupView, Parcelable};
pub use utils::error::{AidError, Result};
