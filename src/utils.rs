use std::borrow::Borrow;

/// Returns the position of the first element of `haystack` equal to `needle`.
///
/// A missing element is `None`, never a panic.
pub(crate) fn find_index<T, U>(needle: &T, haystack: &[U]) -> Option<usize>
where
    T: PartialEq + ?Sized,
    U: Borrow<T>,
{
    haystack.iter().position(|item| item.borrow() == needle)
}
