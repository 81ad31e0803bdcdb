//! # Resource Models
//!
//! A resource model binds a finite identifier set to a unit type and picks
//! the store layout. It carries no runtime state.
//!
//! Models are normally declared with [`resource_model!`](crate::resource_model):
//!
//! ```rust
//! vessel_flow::resource_model! {
//!     /// Ship tank contents.
//!     pub struct Tank;
//!     units = f32;
//!     /// Tank resource identifiers.
//!     pub enum TankResource {
//!         /// Engine fuel.
//!         Fuel,
//!         /// Breathable air.
//!         Oxygen,
//!     }
//! }
//!
//! use vessel_flow::{ResourceId, ResourceModel};
//! assert_eq!(TankResource::COUNT, 2);
//! assert_eq!(TankResource::from_name("oxygen"), Some(TankResource::Oxygen));
//! ```
//!
//! The macro turns every malformed definition into a build failure: an empty
//! variant list does not match, a unit type without a [`Units`] impl does not
//! satisfy the trait bound, and more than 256 identifiers overflow `repr(u8)`.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::layout::AmountStorage;
use crate::units::Units;

/// A zero-based enumerable resource identifier.
pub trait ResourceId: Copy + Eq + Ord + Hash + Debug + 'static {
    /// Number of distinct identifiers.
    const COUNT: usize;

    /// Zero-based position of this identifier.
    fn ordinal(self) -> usize;

    /// Identifier at `ordinal`, if any.
    fn from_ordinal(ordinal: usize) -> Option<Self>;

    /// Stable display name.
    fn name(self) -> &'static str;

    /// Looks up an identifier by name, ignoring ASCII case.
    fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|id| id.name().eq_ignore_ascii_case(name))
    }

    /// Iterates every identifier in ordinal order.
    fn all() -> AllIds<Self> {
        AllIds {
            next: 0,
            _ids: PhantomData,
        }
    }
}

/// Iterator over every identifier of a [`ResourceId`] type.
#[derive(Clone, Debug)]
pub struct AllIds<Id> {
    next: usize,
    _ids: PhantomData<Id>,
}

impl<Id: ResourceId> Iterator for AllIds<Id> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let id = Id::from_ordinal(self.next)?;
        self.next += 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = Id::COUNT.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<Id: ResourceId> ExactSizeIterator for AllIds<Id> {}

/// Compile-time description of a family of resources.
pub trait ResourceModel: 'static {
    /// The identifier set.
    type Id: ResourceId;

    /// The numeric unit.
    type Units: Units;

    /// Amount storage used by stores of this model (dense or sparse).
    type Storage: AmountStorage<Self::Id, Self::Units>;

    /// When true, stores assert on drop (debug builds) that every amount
    /// was consumed.
    const CHECK_FLOW: bool = false;
}

/// Declares a resource identifier enum and its [`ResourceModel`].
///
/// The store layout is selected here, once: dense when
/// `COUNT * size_of::<Units>()` fits in a cache line minus a pointer,
/// sparse otherwise. Put `check_flow = true;` before `units` to enable the
/// teardown check.
#[macro_export]
macro_rules! resource_model {
    (
        $(#[$model_meta:meta])*
        $model_vis:vis struct $model:ident;
        $(check_flow = $check:expr;)?
        units = $units:ty;
        $(#[$id_meta:meta])*
        $id_vis:vis enum $id:ident {
            $( $(#[$variant_meta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$id_meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u8)]
        $id_vis enum $id {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $id {
            const VARIANTS: &'static [$id] = &[$( $id::$variant ),+];
        }

        impl $crate::model::ResourceId for $id {
            const COUNT: usize = <$id>::VARIANTS.len();

            #[inline]
            fn ordinal(self) -> usize {
                self as usize
            }

            #[inline]
            fn from_ordinal(ordinal: usize) -> ::core::option::Option<Self> {
                <$id>::VARIANTS.get(ordinal).copied()
            }

            fn name(self) -> &'static str {
                match self {
                    $( $id::$variant => ::core::stringify!($variant), )+
                }
            }
        }

        $(#[$model_meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        $model_vis struct $model;

        impl $crate::model::ResourceModel for $model {
            type Id = $id;
            type Units = $units;
            type Storage = <$crate::layout::Select<
                { $crate::layout::prefers_dense::<$units>(<$id as $crate::model::ResourceId>::COUNT) },
            > as $crate::layout::LayoutFor<
                $id,
                $units,
                { <$id as $crate::model::ResourceId>::COUNT },
            >>::Storage;
            $( const CHECK_FLOW: bool = $check; )?
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::resource_model! {
        /// Test model.
        pub struct Crafting;
        units = u32;
        /// Test identifiers.
        pub enum Material {
            Wood,
            Stone,
            Iron,
        }
    }

    #[test]
    fn test_identifier_ordinals() {
        assert_eq!(Material::COUNT, 3);
        assert_eq!(Material::Stone.ordinal(), 1);
        assert_eq!(Material::from_ordinal(2), Some(Material::Iron));
        assert_eq!(Material::from_ordinal(3), None);
    }

    #[test]
    fn test_identifier_names() {
        assert_eq!(Material::Wood.name(), "Wood");
        assert_eq!(Material::from_name("iron"), Some(Material::Iron));
        assert_eq!(Material::from_name("gold"), None);
    }

    #[test]
    fn test_all_in_ordinal_order() {
        let all: Vec<_> = Material::all().collect();
        assert_eq!(all, vec![Material::Wood, Material::Stone, Material::Iron]);
        assert_eq!(Material::all().len(), 3);
    }

    #[test]
    fn test_flow_check_defaults_off() {
        assert!(!<Crafting as ResourceModel>::CHECK_FLOW);
    }
}
