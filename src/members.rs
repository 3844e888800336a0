//! Preserved-member registration.
//!
//! The store never inspects component types at runtime. Instead a component
//! type publishes an accessor table: one [`MemberAccessor`] per preserved
//! member, each pairing a [`MemberDescriptor`] with getter/setter closures.
//! The [`preserve_state!`] macro generates the table from a list of member
//! names, playing the role of a marker attribute; a `base` clause chains an
//! embedded base type's table so preservation declared on a base carries to
//! every type that embeds it.

use crate::error::{Result, StateError};
use crate::types::{MemberDescriptor, MemberKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

type Getter<C> = Box<dyn Fn(&C) -> Result<Option<Value>> + Send + Sync>;
type Setter<C> = Box<dyn Fn(&mut C, Value) -> Result<()> + Send + Sync>;

/// A single preserved member slot on component type `C`.
pub struct MemberAccessor<C> {
    descriptor: MemberDescriptor,
    get: Getter<C>,
    set: Setter<C>,
}

impl<C: 'static> MemberAccessor<C> {
    /// Accessor for a property slot.
    pub fn property<T, G, S>(
        declared_by: &'static str,
        name: &'static str,
        get: G,
        set: S,
    ) -> Self
    where
        T: Serialize + DeserializeOwned,
        G: Fn(&C) -> &T + Send + Sync + 'static,
        S: Fn(&mut C) -> &mut T + Send + Sync + 'static,
    {
        Self::new(MemberKind::Property, declared_by, name, get, set)
    }

    /// Accessor for a field slot.
    pub fn field<T, G, S>(declared_by: &'static str, name: &'static str, get: G, set: S) -> Self
    where
        T: Serialize + DeserializeOwned,
        G: Fn(&C) -> &T + Send + Sync + 'static,
        S: Fn(&mut C) -> &mut T + Send + Sync + 'static,
    {
        Self::new(MemberKind::Field, declared_by, name, get, set)
    }

    fn new<T, G, S>(
        kind: MemberKind,
        declared_by: &'static str,
        name: &'static str,
        get: G,
        set: S,
    ) -> Self
    where
        T: Serialize + DeserializeOwned,
        G: Fn(&C) -> &T + Send + Sync + 'static,
        S: Fn(&mut C) -> &mut T + Send + Sync + 'static,
    {
        MemberAccessor {
            descriptor: MemberDescriptor {
                name,
                declared_by,
                kind,
                readable: true,
                writable: true,
            },
            get: Box::new(move |component| {
                let value = serde_json::to_value(get(component)).map_err(|e| {
                    StateError::Capture {
                        declared_by: declared_by.to_string(),
                        name: name.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                // Null means the member is absent; it is excluded from the
                // snapshot so restore leaves the slot at its default. Note
                // serde_json serializes non-finite floats as null, so a NaN
                // or infinite member is treated as absent too.
                Ok(if value.is_null() { None } else { Some(value) })
            }),
            set: Box::new(move |component, value| {
                *set(component) =
                    serde_json::from_value(value).map_err(|e| StateError::TypeMismatch {
                        declared_by: declared_by.to_string(),
                        name: name.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(())
            }),
        }
    }

    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }

    /// Read the member's current value. `None` when the value is null/absent.
    pub fn capture(&self, component: &C) -> Result<Option<Value>> {
        (self.get)(component)
    }

    /// Write a captured value back onto the member slot.
    pub fn apply(&self, component: &mut C, value: Value) -> Result<()> {
        (self.set)(component, value)
    }

    /// Project this accessor through an embedded base struct, so a member
    /// declared on the base is addressable on the embedding type. The
    /// descriptor keeps the base as its declaring type.
    pub fn lift<D, P, PM>(self, project: P, project_mut: PM) -> MemberAccessor<D>
    where
        D: 'static,
        P: Fn(&D) -> &C + Send + Sync + 'static,
        PM: Fn(&mut D) -> &mut C + Send + Sync + 'static,
    {
        let MemberAccessor {
            descriptor,
            get,
            set,
        } = self;
        MemberAccessor {
            descriptor,
            get: Box::new(move |component| get(project(component))),
            set: Box::new(move |component, value| set(project_mut(component), value)),
        }
    }
}

/// Implemented by component types whose marked members survive framework
/// destroy/recreate cycles. Usually generated by [`preserve_state!`].
pub trait PreserveState: Sized + 'static {
    /// Accessor table for every preserved member, most-derived type first.
    ///
    /// Within one type's contribution the declaration order is kept; the
    /// store enumerates properties before fields across the whole table at
    /// capture time.
    fn preserved_members() -> Vec<MemberAccessor<Self>>;
}

/// Marks which members of a component type are preserved across a
/// destroy/recreate cycle and generates its [`PreserveState`] impl.
///
/// Sections are optional. `properties` and `fields` list member names in
/// declaration order; `base` chains the table of an embedded base type, so
/// members marked on the base need no redeclaration here.
///
/// Member values travel through serde as JSON values. A value that
/// serializes to null is excluded from the snapshot (`Option::None`, and
/// also non-finite floats, which serde_json renders as null): on restore
/// the slot keeps whatever the fresh instance already holds.
///
/// ```ignore
/// preserve_state! {
///     FilterPanel {
///         properties { query, page }
///         fields { last_input }
///         base base: PanelBase
///     }
/// }
/// ```
#[macro_export]
macro_rules! preserve_state {
    (
        $ty:ident {
            $( properties { $($prop:ident),* $(,)? } )?
            $( fields { $($field:ident),* $(,)? } )?
            $( base $base_member:ident : $base_ty:ty )?
        }
    ) => {
        impl $crate::PreserveState for $ty {
            fn preserved_members() -> ::std::vec::Vec<$crate::MemberAccessor<Self>> {
                #[allow(unused_mut)]
                let mut members: ::std::vec::Vec<$crate::MemberAccessor<Self>> =
                    ::std::vec::Vec::new();
                $($(
                    members.push($crate::MemberAccessor::property(
                        stringify!($ty),
                        stringify!($prop),
                        |component: &Self| &component.$prop,
                        |component: &mut Self| &mut component.$prop,
                    ));
                )*)?
                $($(
                    members.push($crate::MemberAccessor::field(
                        stringify!($ty),
                        stringify!($field),
                        |component: &Self| &component.$field,
                        |component: &mut Self| &mut component.$field,
                    ));
                )*)?
                $(
                    members.extend(
                        <$base_ty as $crate::PreserveState>::preserved_members()
                            .into_iter()
                            .map(|member| member.lift(
                                |component: &Self| &component.$base_member,
                                |component: &mut Self| &mut component.$base_member,
                            )),
                    );
                )?
                members
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Toggle {
        enabled: bool,
        note: Option<String>,
    }

    crate::preserve_state! {
        Toggle {
            properties { enabled }
            fields { note }
        }
    }

    #[derive(Default)]
    struct Labeled {
        base: Toggle,
        label: Option<String>,
    }

    crate::preserve_state! {
        Labeled {
            properties { label }
            base base: Toggle
        }
    }

    #[test]
    fn test_table_order_and_descriptors() {
        let members = Toggle::preserved_members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].descriptor().name, "enabled");
        assert_eq!(members[0].descriptor().kind, MemberKind::Property);
        assert_eq!(members[1].descriptor().name, "note");
        assert_eq!(members[1].descriptor().kind, MemberKind::Field);
        assert!(members.iter().all(|m| m.descriptor().declared_by == "Toggle"));
    }

    #[test]
    fn test_capture_excludes_null() {
        let toggle = Toggle {
            enabled: true,
            note: None,
        };
        let members = Toggle::preserved_members();

        assert_eq!(members[0].capture(&toggle).unwrap(), Some(json!(true)));
        assert_eq!(members[1].capture(&toggle).unwrap(), None);
    }

    #[derive(Default)]
    struct Meter {
        ratio: f64,
    }

    crate::preserve_state! {
        Meter {
            properties { ratio }
        }
    }

    #[test]
    fn test_non_finite_float_treated_as_absent() {
        let members = Meter::preserved_members();

        let meter = Meter { ratio: f64::NAN };
        assert_eq!(members[0].capture(&meter).unwrap(), None);

        let meter = Meter {
            ratio: f64::INFINITY,
        };
        assert_eq!(members[0].capture(&meter).unwrap(), None);

        let meter = Meter { ratio: 0.5 };
        assert_eq!(members[0].capture(&meter).unwrap(), Some(json!(0.5)));
    }

    #[test]
    fn test_apply_writes_slot() {
        let mut toggle = Toggle::default();
        let members = Toggle::preserved_members();

        members[1].apply(&mut toggle, json!("remember me")).unwrap();
        assert_eq!(toggle.note.as_deref(), Some("remember me"));
    }

    #[test]
    fn test_apply_type_mismatch() {
        let mut toggle = Toggle::default();
        let members = Toggle::preserved_members();

        // `enabled` is a bool slot.
        let err = members[0].apply(&mut toggle, json!("yes")).unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { name, .. } if name == "enabled"));
    }

    #[test]
    fn test_base_members_keep_declaring_type() {
        let members = Labeled::preserved_members();
        assert_eq!(members.len(), 3);
        assert_eq!(members[0].descriptor().declared_by, "Labeled");
        assert_eq!(members[1].descriptor().declared_by, "Toggle");
        assert_eq!(members[2].descriptor().declared_by, "Toggle");

        // Lifted accessors read and write through the embedded base.
        let mut labeled = Labeled::default();
        members[1].apply(&mut labeled, json!(true)).unwrap();
        assert!(labeled.base.enabled);
        assert_eq!(members[1].capture(&labeled).unwrap(), Some(json!(true)));
    }
}
