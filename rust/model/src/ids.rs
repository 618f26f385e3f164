// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed element ids.
//!
//! Every cross-reference in the model is one of these newtypes around the
//! externally supplied string id. Typed ids make it impossible to hand a
//! plate id to a joint lookup, and their `Ord` impl gives every scan a
//! deterministic iteration order.

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

id_type! {
    /// Id of a structural member (beam, column, brace).
    MemberId
}

id_type! {
    /// Id of an inferred or supplied joint.
    JointId
}

id_type! {
    /// Id of a fabrication plate.
    PlateId
}

id_type! {
    /// Id of a bolt attached to a plate.
    BoltId
}

id_type! {
    /// Id of a detected clash, unique within one detection pass.
    ClashId
}
