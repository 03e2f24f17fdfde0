//! Closed enumerations shared by every component: type, manufacture method and status.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Component type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentType {
    Base,
    Project,
    Assembly,
    Part,
    Mechanical,
    Measured,
    Electronic,
    Electromechanical,
    Consumable,
    Jig,
    Placeholder,
}

impl ComponentType {
    pub const ALL: [ComponentType; 11] = [
        ComponentType::Base,
        ComponentType::Project,
        ComponentType::Assembly,
        ComponentType::Part,
        ComponentType::Mechanical,
        ComponentType::Measured,
        ComponentType::Electronic,
        ComponentType::Electromechanical,
        ComponentType::Consumable,
        ComponentType::Jig,
        ComponentType::Placeholder,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ComponentType::Base => "Base",
            ComponentType::Project => "Project",
            ComponentType::Assembly => "Assembly",
            ComponentType::Part => "Part",
            ComponentType::Mechanical => "Mechanical",
            ComponentType::Measured => "Measured",
            ComponentType::Electronic => "Electronic",
            ComponentType::Electromechanical => "Electromechanical",
            ComponentType::Consumable => "Consumable",
            ComponentType::Jig => "Jig",
            ComponentType::Placeholder => "Placeholder",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComponentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ComponentType::ALL
            .into_iter()
            .find(|tp| tp.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownComponentType(s.to_string()))
    }
}

/// How a component gets made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manufacture {
    Printed,
    Machined,
    ModifiedHardware,
    Lasercut,
    Bought,
    Assembled,
    Any,
}

impl Manufacture {
    pub const ALL: [Manufacture; 7] = [
        Manufacture::Printed,
        Manufacture::Machined,
        Manufacture::ModifiedHardware,
        Manufacture::Lasercut,
        Manufacture::Bought,
        Manufacture::Assembled,
        Manufacture::Any,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Manufacture::Printed => "3D printed",
            Manufacture::Machined => "Machined",
            Manufacture::ModifiedHardware => "Modified Hardware",
            Manufacture::Lasercut => "Lasercut",
            Manufacture::Bought => "Bought",
            Manufacture::Assembled => "Assembled",
            Manufacture::Any => "Any",
        }
    }
}

impl fmt::Display for Manufacture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Manufacture {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Manufacture::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::InvalidFieldValue {
                field: "manufacture".to_string(),
                value: s.to_string(),
            })
    }
}

/// Advancement status of a component.
///
/// "Ready For Manufacture" and "Testing" share a value with
/// `ReadyForPurchase` and `WaitingForShipping`; they parse to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    NotDesigned,
    DesignInProgress,
    Designed,
    ReadyForPurchase,
    WaitingForShipping,
    CadPolishing,
    Done,
    HasCad,
    HasntCad,
    Deprecated,
    Invisible,
}

impl Status {
    pub const ALL: [Status; 11] = [
        Status::NotDesigned,
        Status::DesignInProgress,
        Status::Designed,
        Status::ReadyForPurchase,
        Status::WaitingForShipping,
        Status::CadPolishing,
        Status::Done,
        Status::HasCad,
        Status::HasntCad,
        Status::Deprecated,
        Status::Invisible,
    ];

    /// Numeric code; the 1000+ range marks BOM visibility flags rather than progress.
    pub fn code(&self) -> u16 {
        match self {
            Status::NotDesigned => 0,
            Status::DesignInProgress => 1,
            Status::Designed => 2,
            Status::ReadyForPurchase => 3,
            Status::WaitingForShipping => 4,
            Status::CadPolishing => 5,
            Status::Done => 6,
            Status::HasCad => 1001,
            Status::HasntCad => 1002,
            Status::Deprecated => 1003,
            Status::Invisible => 1004,
        }
    }

    /// Human readable, title-cased name.
    pub fn title(&self) -> &'static str {
        match self {
            Status::NotDesigned => "Not Designed",
            Status::DesignInProgress => "Design In Progress",
            Status::Designed => "Designed",
            Status::ReadyForPurchase => "Ready For Purchase",
            Status::WaitingForShipping => "Waiting For Shipping",
            Status::CadPolishing => "CAD Polishing",
            Status::Done => "Done",
            Status::HasCad => "Has CAD",
            Status::HasntCad => "Hasn't CAD",
            Status::Deprecated => "Deprecated",
            Status::Invisible => "Invisible",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Status {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("Ready For Manufacture") {
            return Ok(Status::ReadyForPurchase);
        }
        if wanted.eq_ignore_ascii_case("Testing") {
            return Ok(Status::WaitingForShipping);
        }
        Status::ALL
            .into_iter()
            .find(|st| st.title().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::InvalidFieldValue {
                field: "status".to_string(),
                value: s.to_string(),
            })
    }
}
