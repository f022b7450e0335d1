//! Typed identifiers.
//!
//! Every table keyed by a UUID gets its own newtype so a `ClassId` can never
//! be bound where a `StudentId` is expected. Teachers, students and parents
//! share their primary key with `users.id`; use the `From` impls below to
//! move between the account id and the profile id.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Generates a `Uuid` newtype with sqlx, serde and OpenAPI support.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
        #[schema(value_type = String, format = "uuid")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID.
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an ID from an existing UUID.
            #[inline]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID value.
            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }

            /// Get a reference to the inner UUID.
            #[inline]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// The first eight hex digits, uppercased.
            pub fn short(&self) -> String {
                self.0.simple().to_string()[..8].to_uppercase()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            #[inline]
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl AsRef<Uuid> for $name {
            #[inline]
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <Uuid as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <Uuid as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <Uuid as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <Uuid as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <Uuid as PgHasArrayType>::array_type_info()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Uuid::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies an account row in `users`.
    UserId
);

define_id!(
    /// Identifies a teacher profile.
    TeacherId
);

define_id!(
    /// Identifies a student profile.
    StudentId
);

define_id!(
    /// Identifies a parent profile.
    ParentId
);

define_id!(GradeId);

define_id!(ClassId);

define_id!(SubjectId);

define_id!(
    /// Identifies an academic module.
    ModuleId
);

define_id!(HolidayId);

define_id!(LessonId);

define_id!(ExamId);

define_id!(AssignmentId);

define_id!(ResultId);

define_id!(AttendanceId);

define_id!(EventId);

define_id!(AnnouncementId);

macro_rules! profile_of_user {
    ($($profile:ident),*) => {
        $(
            impl From<UserId> for $profile {
                fn from(id: UserId) -> Self {
                    Self(id.0)
                }
            }

            impl From<$profile> for UserId {
                fn from(id: $profile) -> Self {
                    Self(id.0)
                }
            }
        )*
    };
}

profile_of_user!(TeacherId, StudentId, ParentId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_random() {
        assert_ne!(LessonId::new(), LessonId::new());
    }

    #[test]
    fn short_form_is_eight_uppercase_hex_digits() {
        let id = StudentId::from_uuid(Uuid::from_u128(0xabcdef12_3456_7890_abcd_ef1234567890));
        assert_eq!(id.short(), "ABCDEF12");
    }

    #[test]
    fn debug_names_the_type() {
        let id = ClassId::from_uuid(Uuid::nil());
        assert!(format!("{:?}", id).starts_with("ClassId("));
    }

    #[test]
    fn parses_and_serializes_transparently() {
        let id: ExamId = "12345678-1234-1234-1234-123456789abc".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""12345678-1234-1234-1234-123456789abc""#);

        let back: ExamId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!("nope".parse::<ExamId>().is_err());
    }

    #[test]
    fn profile_ids_share_the_account_key() {
        let user = UserId::new();
        let teacher = TeacherId::from(user);
        assert_eq!(UserId::from(teacher), user);
        assert_eq!(teacher.into_inner(), user.into_inner());
    }
}
