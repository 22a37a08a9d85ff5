//! Construction sugar for [`Reflectable`](crate::Reflectable) impls.

/// Generate a [`Reflectable`](crate::Reflectable) impl from a field list.
///
/// Fields are enumerated in the order written, which becomes the table's
/// positional order. Each field's type must satisfy
/// [`PropValue`](crate::PropValue). Prefix a field with `readonly` to omit
/// the setter or `writeonly` to omit the getter.
///
/// ```rust,ignore
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// reflectable! {
///     Person {
///         name: String,
///         readonly age: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! reflectable {
    ($ty:ty { $($body:tt)* }) => {
        impl $crate::Reflectable for $ty {
            fn descriptors(&self) -> ::std::vec::Vec<$crate::PropertyDescriptor> {
                let mut properties = ::std::vec::Vec::new();
                $crate::__reflectable_fields!(properties, $ty, $($body)*);
                properties
            }
        }
    };
}

/// Field-list muncher backing [`reflectable!`]. Not part of the public API.
#[doc(hidden)]
#[macro_export]
macro_rules! __reflectable_fields {
    ($props:ident, $ty:ty $(,)?) => {};
    ($props:ident, $ty:ty, readonly $name:ident : $fty:ty $(, $($rest:tt)*)?) => {
        $props.push($crate::PropertyDescriptor::read_only::<$ty, $fty>(
            stringify!($name),
            |instance: &$ty| ::std::clone::Clone::clone(&instance.$name),
        ));
        $crate::__reflectable_fields!($props, $ty $(, $($rest)*)?);
    };
    ($props:ident, $ty:ty, writeonly $name:ident : $fty:ty $(, $($rest:tt)*)?) => {
        $props.push($crate::PropertyDescriptor::write_only::<$ty, $fty>(
            stringify!($name),
            |instance: &mut $ty, value: $fty| {
                instance.$name = value;
            },
        ));
        $crate::__reflectable_fields!($props, $ty $(, $($rest)*)?);
    };
    ($props:ident, $ty:ty, $name:ident : $fty:ty $(, $($rest:tt)*)?) => {
        $props.push($crate::PropertyDescriptor::read_write::<$ty, $fty>(
            stringify!($name),
            |instance: &$ty| ::std::clone::Clone::clone(&instance.$name),
            |instance: &mut $ty, value: $fty| {
                instance.$name = value;
            },
        ));
        $crate::__reflectable_fields!($props, $ty $(, $($rest)*)?);
    };
}
