//! Differences between a stored collection and a desired one.
//!
//! `persisted` is what storage currently holds, `transient` is what the
//! caller wants it to hold. `None` stands for "not known", which is distinct
//! from an empty collection. Elements compare by value equality; the scan is
//! quadratic, which suits association sets of a few dozen elements.

/// Elements of `persisted` absent from `transient`.
///
/// `None` if `persisted` is `None`; all of `persisted` if `transient` is
/// `None`.
pub fn to_remove<T: PartialEq + Clone>(
    persisted: Option<&[T]>,
    transient: Option<&[T]>,
) -> Option<Vec<T>> {
    let persisted = persisted?;

    Some(match transient {
        None => persisted.to_vec(),
        Some(transient) => complement(persisted, transient),
    })
}

/// Elements of `transient` absent from `persisted`.
///
/// `None` if `transient` is `None`; all of `transient` if `persisted` is
/// `None`.
pub fn to_add<T: PartialEq + Clone>(
    persisted: Option<&[T]>,
    transient: Option<&[T]>,
) -> Option<Vec<T>> {
    let transient = transient?;

    Some(match persisted {
        None => transient.to_vec(),
        Some(persisted) => complement(transient, persisted),
    })
}

/// Elements of `from` not in `other`, in `from`'s order.
fn complement<T: PartialEq + Clone>(from: &[T], other: &[T]) -> Vec<T> {
    from.iter()
        .filter(|item| !other.contains(item))
        .cloned()
        .collect()
}
