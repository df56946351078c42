//! Status enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Resolve a database status ID back to the enum.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Pending = 1,
        InProgress = 2,
        Completed = 3,
    }
}

define_status_enum! {
    /// Scope item delivery status.
    ScopeItemStatus {
        Pending = 1,
        InProgress = 2,
        Completed = 3,
    }
}

define_status_enum! {
    /// Client request triage status. `Pending` is only ever the initial
    /// state; updates may target `InScope` or `OutOfScope` but never
    /// `Pending` again.
    RequestStatus {
        Pending = 1,
        InScope = 2,
        OutOfScope = 3,
    }
}

define_status_enum! {
    /// Change order approval status. `Approved` and `Rejected` are
    /// absorbing: once an order leaves `Pending`, nothing about it may
    /// change again.
    ChangeOrderStatus {
        Pending = 1,
        Approved = 2,
        Rejected = 3,
    }
}

define_status_enum! {
    /// Payment link lifecycle status.
    PaymentLinkStatus {
        Active = 1,
        Inactive = 2,
    }
}

impl ChangeOrderStatus {
    /// The allowed-transitions table. `Pending` may move to any status
    /// (including itself); the two decided statuses have no outgoing
    /// transitions.
    pub fn can_transition(self, target: ChangeOrderStatus) -> bool {
        match self {
            ChangeOrderStatus::Pending => matches!(
                target,
                ChangeOrderStatus::Pending
                    | ChangeOrderStatus::Approved
                    | ChangeOrderStatus::Rejected
            ),
            ChangeOrderStatus::Approved | ChangeOrderStatus::Rejected => false,
        }
    }

    /// Whether this status admits no further mutation at all.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ChangeOrderStatus::Pending)
    }

    /// Lowercase label used in activity feeds.
    pub fn label(self) -> &'static str {
        match self {
            ChangeOrderStatus::Pending => "pending",
            ChangeOrderStatus::Approved => "approved",
            ChangeOrderStatus::Rejected => "rejected",
        }
    }
}

impl RequestStatus {
    /// Whether `self` is a status an update may set. Creation always starts
    /// at `Pending`; the update path only accepts the two triage outcomes.
    pub fn is_settable(self) -> bool {
        matches!(self, RequestStatus::InScope | RequestStatus::OutOfScope)
    }
}
