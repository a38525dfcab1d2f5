use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Values with a notion of truthiness: `false`, zero, empty and `None` are falsy.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy_number {
    ($($t:ty),*) => {
        $(
            impl Truthy for $t {
                fn is_truthy(&self) -> bool {
                    *self != (0 as $t)
                }
            }
        )*
    };
}

impl_truthy_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

macro_rules! impl_truthy_collection {
    ($($t:ty => [$($g:tt)*]),* $(,)?) => {
        $(
            impl<$($g)*> Truthy for $t {
                fn is_truthy(&self) -> bool {
                    !self.is_empty()
                }
            }
        )*
    };
}

impl_truthy_collection!(
    Vec<T> => [T],
    VecDeque<T> => [T],
    [T] => [T],
    HashSet<T, S> => [T, S],
    BTreeSet<T> => [T],
    HashMap<K, V, S> => [K, V, S],
    BTreeMap<K, V> => [K, V],
);

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T, const N: usize> Truthy for [T; N] {
    fn is_truthy(&self) -> bool {
        N > 0
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Box<T> {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values() {
        assert!(!false.is_truthy());
        assert!(!0i32.is_truthy());
        assert!(!0.0f64.is_truthy());
        assert!(!"".is_truthy());
        assert!(!Vec::<u8>::new().is_truthy());
        assert!(!None::<u8>.is_truthy());
    }

    #[test]
    fn truthy_values() {
        assert!(1i32.is_truthy());
        assert!("x".is_truthy());
        assert!(vec![0].is_truthy());
        assert!(Some(0).is_truthy());
        assert!(HashMap::from([(1, 2)]).is_truthy());
    }
}
