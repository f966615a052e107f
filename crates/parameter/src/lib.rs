//! Declarative, validated parameters for configurable objects.
//!
//! A parameter is declared once with a [`ParameterOptions`] value and
//! becomes a named slot with a default, a validation pipeline and a
//! read/write accessor. Declarations live in a [`ParameterClass`] (shared
//! by every instance) or directly on a [`Parameters`] instance.
//!
//! ```
//! use tunable_parameter::prelude::*;
//! use serde_json::json;
//!
//! let class = ParameterClass::new();
//! class
//!     .param("port", ParameterOptions::new().with_default(8080).coerce(CoercionKind::Integer))
//!     .unwrap();
//!
//! let mut params = class.instantiate();
//! assert_eq!(params.get("port").unwrap(), json!(8080));
//! assert_eq!(params.set("port", "9090").unwrap(), json!(9090));
//! ```

pub mod accessor;
pub mod collection;
pub mod configurable;
pub mod convert;
pub mod def;
pub mod error;
pub mod kind;
pub mod options;
pub mod validation;
pub mod value;
pub mod values;

pub use accessor::Accessor;
pub use collection::{ParameterClass, ParameterRegistry};
pub use configurable::{Configurable, Parameters};
pub use convert::{Convert, ConvertFn, ConvertTarget, MethodTable};
pub use def::ParameterDescriptor;
pub use error::ParameterError;
pub use kind::CoercionKind;
pub use options::{ParameterOptions, ValueRange};
pub use value::{Capability, ValueType};
pub use values::{ValueSnapshot, ValueStore};

pub mod prelude {
    pub use crate::collection::{ParameterClass, ParameterRegistry};
    pub use crate::configurable::{Configurable, Parameters};
    pub use crate::convert::{Convert, ConvertTarget, MethodTable};
    pub use crate::def::ParameterDescriptor;
    pub use crate::error::ParameterError;
    pub use crate::kind::CoercionKind;
    pub use crate::options::{ParameterOptions, ValueRange};
    pub use crate::value::{Capability, ValueType};
}
