//! Rules about the design of types.
//!
//! # Key Components
//!
//! - [`ConsiderUsingStaticTypeRule`] - Classes with only static members should be `static`
//! - [`classify`] / [`Classification`] - The underlying inheritance chain analysis

mod static_type;

pub use static_type::{
    classify, is_all_static, Classification, ConsiderUsingStaticTypeRule, InstanceMemberKind,
    Unclassifiable, MAX_TOLERATED_CTOR_PARAMS,
};
