use core::fmt::{Debug, Display};

/// A trait representing an account identifier.
///
/// Token identifiers are account identifiers too: a token is named by the
/// account that issues it.
pub trait AccountId: Clone + Ord + Debug + Display {}

impl AccountId for i32 {}

impl AccountId for u64 {}

impl AccountId for String {}

impl AccountId for &str {}
