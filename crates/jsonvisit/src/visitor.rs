//! The event-consumer contract.

use crate::error::Error;
use crate::scalar::Scalar;

/// Receives structural events, either from the parser (in document order) or
/// from a tree walk.
///
/// `key` is `Some` when the event is the value of a mapping entry, `None` at
/// the top level and inside sequences. Returning an error aborts whatever is
/// driving the visitor; events already delivered are not rolled back.
///
/// [`crate::TreeBuilder`] materializes events into a [`crate::Value`];
/// [`crate::JsonBuilder`] turns them straight back into text. Implement this
/// trait to consume a document without building anything:
///
/// ```
/// use jsonvisit::{Error, Scalar, Visitor};
///
/// #[derive(Default)]
/// struct CountStrings(usize);
///
/// impl Visitor for CountStrings {
///     fn scalar(&mut self, _key: Option<&str>, value: Scalar) -> Result<(), Error> {
///         if matches!(value, Scalar::String(_)) {
///             self.0 += 1;
///         }
///         Ok(())
///     }
///     fn push_sequence(&mut self, _key: Option<&str>) -> Result<(), Error> {
///         Ok(())
///     }
///     fn push_mapping(&mut self, _key: Option<&str>) -> Result<(), Error> {
///         Ok(())
///     }
///     fn pop(&mut self) -> Result<(), Error> {
///         Ok(())
///     }
/// }
///
/// let mut counter = CountStrings::default();
/// jsonvisit::load_with(r#"["a", 1, {"k": "b"}]"#, &mut counter)?;
/// assert_eq!(counter.0, 2);
/// # Ok::<(), Error>(())
/// ```
pub trait Visitor {
    /// A scalar value.
    fn scalar(&mut self, key: Option<&str>, value: Scalar) -> Result<(), Error>;

    /// A sequence opens; its elements follow, then a matching [`Self::pop`].
    fn push_sequence(&mut self, key: Option<&str>) -> Result<(), Error>;

    /// A mapping opens; its entries follow, then a matching [`Self::pop`].
    fn push_mapping(&mut self, key: Option<&str>) -> Result<(), Error>;

    /// The innermost open container closes.
    fn pop(&mut self) -> Result<(), Error>;
}
