//! The in-progress biodata document.
//!
//! Every field is free text and may be empty; an empty string means the
//! value is absent. Only the full name and date of birth are required, and
//! the only other check is the shape of the email address.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Layout;
use crate::domain::foundation::ValidationError;

/// Form section a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Personal,
    Introduction,
    Family,
    Education,
    Professional,
    Lifestyle,
    Contact,
}

/// One person's biodata, as typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiodataDraft {
    // Personal
    pub full_name: String,
    #[serde(alias = "dob")]
    pub date_of_birth: String,
    pub age: String,
    pub height: String,
    pub complexion: String,
    pub blood_group: String,
    pub gender: String,
    pub religion: String,
    pub caste: String,
    pub sub_caste: String,
    pub mother_tongue: String,
    pub marital_status: String,
    pub manglik_status: String,
    /// Data URL or link to the profile photo.
    pub photo: String,

    pub introduction: String,

    // Family
    pub father_name: String,
    pub father_occupation: String,
    pub mother_name: String,
    pub mother_occupation: String,
    pub siblings: String,
    pub family_type: String,
    pub family_values: String,
    pub family_location: String,
    pub native_place: String,

    // Education
    pub highest_qualification: String,
    pub college_name: String,
    pub graduation_year: String,

    // Professional
    pub occupation: String,
    pub company_name: String,
    pub role: String,
    pub work_mode: String,
    pub annual_income: String,

    // Lifestyle
    pub diet: String,
    pub smoking: String,
    pub drinking: String,
    pub hobbies: String,
    pub interests: String,
    pub languages_known: String,

    // Contact
    pub phone: String,
    pub email: String,
    pub address: String,
    pub contact_person: String,

    pub layout: Layout,
}

macro_rules! draft_fields {
    ($($variant:ident => $field:ident, $key:literal, $section:ident;)*) => {
        /// Addressable text field of a [`BiodataDraft`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum BiodataField {
            $($variant,)*
        }

        impl BiodataField {
            /// Every field in form order.
            pub const ALL: &'static [BiodataField] = &[$(BiodataField::$variant,)*];

            /// Wire key, matching the draft's JSON representation.
            pub fn key(&self) -> &'static str {
                match self {
                    $(BiodataField::$variant => $key,)*
                }
            }

            pub fn section(&self) -> Section {
                match self {
                    $(BiodataField::$variant => Section::$section,)*
                }
            }
        }

        impl BiodataDraft {
            /// Current value of `field`; empty when absent.
            pub fn field(&self, field: BiodataField) -> &str {
                match field {
                    $(BiodataField::$variant => &self.$field,)*
                }
            }

            fn field_mut(&mut self, field: BiodataField) -> &mut String {
                match field {
                    $(BiodataField::$variant => &mut self.$field,)*
                }
            }
        }
    };
}

draft_fields! {
    FullName => full_name, "fullName", Personal;
    DateOfBirth => date_of_birth, "dateOfBirth", Personal;
    Age => age, "age", Personal;
    Height => height, "height", Personal;
    Complexion => complexion, "complexion", Personal;
    BloodGroup => blood_group, "bloodGroup", Personal;
    Gender => gender, "gender", Personal;
    Religion => religion, "religion", Personal;
    Caste => caste, "caste", Personal;
    SubCaste => sub_caste, "subCaste", Personal;
    MotherTongue => mother_tongue, "motherTongue", Personal;
    MaritalStatus => marital_status, "maritalStatus", Personal;
    ManglikStatus => manglik_status, "manglikStatus", Personal;
    Photo => photo, "photo", Personal;
    Introduction => introduction, "introduction", Introduction;
    FatherName => father_name, "fatherName", Family;
    FatherOccupation => father_occupation, "fatherOccupation", Family;
    MotherName => mother_name, "motherName", Family;
    MotherOccupation => mother_occupation, "motherOccupation", Family;
    Siblings => siblings, "siblings", Family;
    FamilyType => family_type, "familyType", Family;
    FamilyValues => family_values, "familyValues", Family;
    FamilyLocation => family_location, "familyLocation", Family;
    NativePlace => native_place, "nativePlace", Family;
    HighestQualification => highest_qualification, "highestQualification", Education;
    CollegeName => college_name, "collegeName", Education;
    GraduationYear => graduation_year, "graduationYear", Education;
    Occupation => occupation, "occupation", Professional;
    CompanyName => company_name, "companyName", Professional;
    Role => role, "role", Professional;
    WorkMode => work_mode, "workMode", Professional;
    AnnualIncome => annual_income, "annualIncome", Professional;
    Diet => diet, "diet", Lifestyle;
    Smoking => smoking, "smoking", Lifestyle;
    Drinking => drinking, "drinking", Lifestyle;
    Hobbies => hobbies, "hobbies", Lifestyle;
    Interests => interests, "interests", Lifestyle;
    LanguagesKnown => languages_known, "languagesKnown", Lifestyle;
    Phone => phone, "phone", Contact;
    Email => email, "email", Contact;
    Address => address, "address", Contact;
    ContactPerson => contact_person, "contactPerson", Contact;
}

impl FromStr for BiodataField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "dob" {
            return Ok(BiodataField::DateOfBirth);
        }
        BiodataField::ALL
            .iter()
            .copied()
            .find(|f| f.key() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("field", format!("unknown field '{}'", s))
            })
    }
}

impl BiodataDraft {
    /// Fields that must be filled before a biodata is complete.
    pub const REQUIRED: [BiodataField; 2] = [BiodataField::FullName, BiodataField::DateOfBirth];

    /// Empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field. Returns true when the value changed.
    pub fn set_field(&mut self, field: BiodataField, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.field_mut(field);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// True if `field` holds a non-blank value. "0" counts as present.
    pub fn has(&self, field: BiodataField) -> bool {
        !self.field(field).trim().is_empty()
    }

    /// True when nothing has been typed yet.
    pub fn is_blank(&self) -> bool {
        BiodataField::ALL.iter().all(|f| !self.has(*f))
    }

    /// Fields with a value, in form order.
    pub fn populated(&self) -> impl Iterator<Item = (BiodataField, &str)> + '_ {
        BiodataField::ALL
            .iter()
            .copied()
            .filter(move |f| self.has(*f))
            .map(move |f| (f, self.field(f)))
    }

    /// File name for an exported PDF: `<Full_Name>_Biodata.pdf`, or
    /// `biodata.pdf` when no name has been entered.
    pub fn export_filename(&self) -> String {
        let name = self
            .full_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        if name.is_empty() {
            "biodata.pdf".to_string()
        } else {
            format!("{}_Biodata.pdf", name)
        }
    }

    /// Shape checks only.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors: Vec<ValidationError> = Self::REQUIRED
            .iter()
            .filter(|f| !self.has(**f))
            .map(|f| ValidationError::empty_field(f.key()))
            .collect();

        if self.has(BiodataField::Email) && !looks_like_email(self.email.trim()) {
            errors.push(ValidationError::invalid_format("email", "not an email address"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}
