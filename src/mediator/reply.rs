//! Type-erased mediator replies.

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

/// A value returned through the mediator, serializable by its concrete type.
///
/// Every `Serialize + Send + 'static` type is a `Reply`. Because `dyn Reply`
/// is itself `Serialize`, a handler can declare `type Response = Box<dyn Reply>`
/// and hand back any concrete value; the body is still encoded with the
/// shape of that value rather than the declared type.
pub trait Reply: Send + 'static {
    /// Encode as a JSON document.
    fn to_json(&self) -> serde_json::Result<Vec<u8>>;

    /// Encode as a JSON value tree.
    fn to_value(&self) -> serde_json::Result<serde_json::Value>;
}

impl<T> Reply for T
where
    T: Serialize + Send + 'static,
{
    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for dyn Reply {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
