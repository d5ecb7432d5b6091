// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

// Rust lacks the BTreeMap and BTreeSet equivalents of vec!

/// Generates the code to initialize a [BTreeMap](std::collections::BTreeMap).
///
/// # Example
/// ```
/// # use std::collections::BTreeMap;
/// # use classlr::btreemap;
/// let days = btreemap![0 => "Monday", 1 => "Tuesday"];
/// assert_eq!(days, BTreeMap::from([(0, "Monday"), (1, "Tuesday")]));
/// ```
#[macro_export]
macro_rules! btreemap {
    () => { std::collections::BTreeMap::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([ $(($key, $value),)+ ])
    };
}

/// Generates the code to initialize a [BTreeSet](std::collections::BTreeSet).
///
/// # Example
/// ```
/// # use std::collections::BTreeSet;
/// # use classlr::btreeset;
/// let days = btreeset!["Monday", "Tuesday"];
/// assert_eq!(days, BTreeSet::from(["Monday", "Tuesday"]));
/// ```
#[macro_export]
macro_rules! btreeset {
    () => { std::collections::BTreeSet::new() };
    ($($item:expr),+ $(,)?) => {
        std::collections::BTreeSet::from([ $($item,)+ ])
    };
}
