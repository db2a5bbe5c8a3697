use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Program {
    Gip,
    Tupad,
}

impl Program {
    pub const ALL: [Program; 2] = [Program::Gip, Program::Tupad];

    pub fn as_str(self) -> &'static str {
        match self {
            Program::Gip => "GIP",
            Program::Tupad => "TUPAD",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Program::Gip => "GOVERNMENT INTERNSHIP PROGRAM (GIP)",
            Program::Tupad => {
                "TULONG PANGHANAPBUHAY SA ATING DISADVANTAGED/DISPLACED WORKERS (TUPAD)"
            }
        }
    }

    /// Inclusive age bounds an applicant must satisfy to enroll.
    pub fn age_bounds(self) -> (u32, u32) {
        match self {
            Program::Gip => (18, 29),
            Program::Tupad => (25, 58),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pending,
    Approved,
    Deployed,
    Completed,
    Rejected,
    Resigned,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Pending,
        Status::Approved,
        Status::Deployed,
        Status::Completed,
        Status::Rejected,
        Status::Resigned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::Approved => "APPROVED",
            Status::Deployed => "DEPLOYED",
            Status::Completed => "COMPLETED",
            Status::Rejected => "REJECTED",
            Status::Resigned => "RESIGNED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Completed | Status::Rejected | Status::Resigned)
    }

    /// Whether an editor may move a record from `self` to `next`.
    ///
    /// The main line is PENDING -> APPROVED -> DEPLOYED -> COMPLETED. REJECTED
    /// and RESIGNED branch off any non-terminal status. Re-setting the current
    /// status is always permitted.
    pub fn can_transition_to(self, next: Status) -> bool {
        if self == next {
            return true;
        }
        match (self, next) {
            (Status::Pending, Status::Approved)
            | (Status::Approved, Status::Deployed)
            | (Status::Deployed, Status::Completed) => true,
            (from, Status::Rejected | Status::Resigned) => !from.is_terminal(),
            _ => false,
        }
    }
}

macro_rules! barangays {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Administrative areas served by the registry, in the order the
        /// office lists them.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Barangay {
            $(#[serde(rename = $name)] $variant,)+
        }

        impl Barangay {
            pub const ALL: &'static [Barangay] = &[$(Barangay::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Barangay::$variant => $name,)+
                }
            }
        }
    };
}

barangays! {
    Aplaya => "APLAYA",
    Balibago => "BALIBAGO",
    Caingin => "CAINGIN",
    Dila => "DILA",
    Dita => "DITA",
    DonJose => "DON JOSE",
    Ibaba => "IBABA",
    Kanluran => "KANLURAN",
    Labas => "LABAS",
    Macabling => "MACABLING",
    Malitlit => "MALITLIT",
    Malusak => "MALUSAK",
    MarketArea => "MARKET AREA",
    Pooc => "POOC",
    PulongSantaCruz => "PULONG SANTA CRUZ",
    SantoDomingo => "SANTO DOMINGO",
    Sinalhan => "SINALHAN",
    Tagapo => "TAGAPO",
}

/// Educational attainment levels offered on the intake form.
pub const EDUCATION_LEVELS: &[&str] = &[
    "JUNIOR HIGH SCHOOL GRADUATE",
    "SENIOR HIGH SCHOOL GRADUATE",
    "HIGH SCHOOL GRADUATE",
    "COLLEGE GRADUATE",
    "TECHNICAL/VOCATIONAL COURSE GRADUATE",
    "ALS SECONDARY GRADUATE",
    "COLLEGE UNDERGRADUATE",
];

macro_rules! str_enum_conversions {
    ($ty:ident, $what:literal) => {
        impl TryFrom<&str> for $ty {
            type Error = anyhow::Error;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let wanted = value.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| anyhow::anyhow!(concat!("Invalid ", $what, " value: {}"), value))
            }
        }

        impl std::str::FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::try_from(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum_conversions!(Program, "program");
str_enum_conversions!(Gender, "gender");
str_enum_conversions!(Status, "status");
str_enum_conversions!(Barangay, "barangay");
