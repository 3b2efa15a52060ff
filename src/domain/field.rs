//! Field registry.
//!
//! The registry is the closed set of inputs the prediction collaborator
//! understands. It is a `static` table so nothing can mutate it after start-up;
//! everything else (the request builder, the TUI form, the linear model loader)
//! reads field names and domains from here.

use std::fmt;

/// One of the twelve model inputs, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Age,
    NumberOfDependants,
    IncomeInLakhs,
    GeneticalRisk,
    InsurancePlan,
    EmploymentStatus,
    Gender,
    MaritalStatus,
    BmiCategory,
    SmokingStatus,
    Region,
    MedicalHistory,
}

/// Whether a field carries a number or a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Numeric => write!(f, "numeric"),
            FieldKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Legal values for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Inclusive range. `step` is the increment the form uses; validation only
    /// checks the bounds.
    Numeric { min: f64, max: f64, step: f64 },
    /// Ordered label set. The first label is the form default.
    Categorical(&'static [&'static str]),
}

impl Domain {
    pub fn kind(&self) -> FieldKind {
        match self {
            Domain::Numeric { .. } => FieldKind::Numeric,
            Domain::Categorical(_) => FieldKind::Categorical,
        }
    }

    /// Human-readable description used in error messages and `premium fields`.
    pub fn describe(&self) -> String {
        match self {
            Domain::Numeric { min, max, step } => format!("{min}..={max} (step {step})"),
            Domain::Categorical(labels) => {
                let quoted: Vec<String> = labels.iter().map(|l| format!("{l:?}")).collect();
                quoted.join(", ")
            }
        }
    }
}

/// Static description of a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub field: Field,
    /// Canonical key sent to the prediction collaborator.
    pub name: &'static str,
    /// Short label for compact form cells.
    pub label: &'static str,
    pub domain: Domain,
}

impl FieldSpec {
    pub fn kind(&self) -> FieldKind {
        self.domain.kind()
    }
}

pub const INSURANCE_PLANS: &[&str] = &["Bronze", "Silver", "Gold"];
/// The empty label is a legitimate "unspecified" choice.
pub const EMPLOYMENT_STATUSES: &[&str] = &["Salaried", "Self-Employed", "Freelancer", ""];
pub const GENDERS: &[&str] = &["Male", "Female"];
pub const MARITAL_STATUSES: &[&str] = &["Unmarried", "Married"];
pub const BMI_CATEGORIES: &[&str] = &["Normal", "Obesity", "Overweight", "Underweight"];
pub const SMOKING_STATUSES: &[&str] = &["No Smoking", "Regular", "Occasional"];
pub const REGIONS: &[&str] = &["Northwest", "Southeast", "Northeast", "Southwest"];
pub const MEDICAL_HISTORIES: &[&str] = &[
    "No Disease",
    "Diabetes",
    "High blood pressure",
    "Diabetes & High blood pressure",
    "Thyroid",
    "Heart disease",
    "High blood pressure & Heart disease",
    "Diabetes & Thyroid",
    "Diabetes & Heart disease",
];

static REGISTRY: [FieldSpec; Field::COUNT] = [
    FieldSpec {
        field: Field::Age,
        name: "Age",
        label: "Age",
        domain: Domain::Numeric { min: 18.0, max: 100.0, step: 1.0 },
    },
    FieldSpec {
        field: Field::NumberOfDependants,
        name: "Number of Dependants",
        label: "Dependants",
        domain: Domain::Numeric { min: 0.0, max: 20.0, step: 1.0 },
    },
    FieldSpec {
        field: Field::IncomeInLakhs,
        name: "Income in Lakhs",
        label: "Income (Lakhs)",
        domain: Domain::Numeric { min: 0.0, max: 200.0, step: 1.0 },
    },
    FieldSpec {
        field: Field::GeneticalRisk,
        name: "Genetical Risk",
        label: "Genetical Risk (0-5)",
        domain: Domain::Numeric { min: 0.0, max: 5.0, step: 1.0 },
    },
    FieldSpec {
        field: Field::InsurancePlan,
        name: "Insurance Plan",
        label: "Insurance Plan",
        domain: Domain::Categorical(INSURANCE_PLANS),
    },
    FieldSpec {
        field: Field::EmploymentStatus,
        name: "Employment Status",
        label: "Employment Status",
        domain: Domain::Categorical(EMPLOYMENT_STATUSES),
    },
    FieldSpec {
        field: Field::Gender,
        name: "Gender",
        label: "Gender",
        domain: Domain::Categorical(GENDERS),
    },
    FieldSpec {
        field: Field::MaritalStatus,
        name: "Marital Status",
        label: "Marital Status",
        domain: Domain::Categorical(MARITAL_STATUSES),
    },
    FieldSpec {
        field: Field::BmiCategory,
        name: "BMI Category",
        label: "BMI Category",
        domain: Domain::Categorical(BMI_CATEGORIES),
    },
    FieldSpec {
        field: Field::SmokingStatus,
        name: "Smoking Status",
        label: "Smoking Status",
        domain: Domain::Categorical(SMOKING_STATUSES),
    },
    FieldSpec {
        field: Field::Region,
        name: "Region",
        label: "Region",
        domain: Domain::Categorical(REGIONS),
    },
    FieldSpec {
        field: Field::MedicalHistory,
        name: "Medical History",
        label: "Medical History",
        domain: Domain::Categorical(MEDICAL_HISTORIES),
    },
];

impl Field {
    pub const COUNT: usize = 12;

    /// All fields in form order (rows of three).
    pub const ALL: [Field; Field::COUNT] = [
        Field::Age,
        Field::NumberOfDependants,
        Field::IncomeInLakhs,
        Field::GeneticalRisk,
        Field::InsurancePlan,
        Field::EmploymentStatus,
        Field::Gender,
        Field::MaritalStatus,
        Field::BmiCategory,
        Field::SmokingStatus,
        Field::Region,
        Field::MedicalHistory,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FieldSpec {
        &REGISTRY[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look up a field by its canonical key (exact match).
    pub fn from_name(name: &str) -> Option<Field> {
        REGISTRY.iter().find(|s| s.name == name).map(|s| s.field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The full registry, in form order.
pub fn registry() -> &'static [FieldSpec] {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_matches_field_indices() {
        for (i, spec) in registry().iter().enumerate() {
            assert_eq!(spec.field.index(), i);
            assert_eq!(Field::ALL[i], spec.field);
        }
    }

    #[test]
    fn registry_has_four_numeric_and_eight_categorical_fields() {
        let numeric = registry()
            .iter()
            .filter(|s| s.kind() == FieldKind::Numeric)
            .count();
        assert_eq!(numeric, 4);
        assert_eq!(registry().len() - numeric, 8);
    }

    #[test]
    fn from_name_round_trips_and_rejects_unknown() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("age"), None);
        assert_eq!(Field::from_name("Blood Type"), None);
    }

    #[test]
    fn employment_status_allows_unspecified() {
        let Domain::Categorical(labels) = Field::EmploymentStatus.spec().domain else {
            panic!("employment status should be categorical");
        };
        assert!(labels.contains(&""));
    }

    #[test]
    fn age_domain_is_18_to_100() {
        assert_eq!(
            Field::Age.spec().domain,
            Domain::Numeric { min: 18.0, max: 100.0, step: 1.0 }
        );
    }
}
