//! Request for an AI-written introduction paragraph.

use serde::Serialize;

use super::{BiodataDraft, BiodataField as F, Layout};

/// Used when the writer answers with nothing.
pub const FALLBACK_EMPTY: &str = "We are pleased to present this biodata for your kind consideration. Please review the detailed sections for more information.";

/// Used when the writer fails.
pub const FALLBACK_ERROR: &str = "An error occurred while generating the introduction. Please try again or fill it manually.";

const NO_HIGHLIGHTS: &str = "No specific highlights provided, but seeking a suitable match.";

const SYSTEM_INSTRUCTIONS: &str = "You are an expert marriage biodata writer specializing in warm, positive and engaging introductory paragraphs. \
The introduction should be a brief overview that sets a positive tone. \
Avoid simply listing details; weave the highlights into a narrative that presents the person in the best possible light for a matrimonial context.";

/// Per-section text summaries of a draft plus the tone to write in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroductionRequest {
    pub personal_details: String,
    pub family_details: String,
    pub education_details: String,
    pub professional_details: String,
    pub lifestyle_details: String,
    pub contact_details: String,
    pub layout: Layout,
}

impl IntroductionRequest {
    pub fn from_draft(draft: &BiodataDraft) -> Self {
        Self {
            personal_details: summarize(
                draft,
                &[
                    ("Name", F::FullName),
                    ("Age", F::Age),
                    ("DOB", F::DateOfBirth),
                    ("Height", F::Height),
                    ("Gender", F::Gender),
                    ("Complexion", F::Complexion),
                    ("Religion", F::Religion),
                    ("Caste", F::Caste),
                    ("Sub-caste", F::SubCaste),
                    ("Mother Tongue", F::MotherTongue),
                    ("Marital Status", F::MaritalStatus),
                    ("Manglik Status", F::ManglikStatus),
                    ("Blood Group", F::BloodGroup),
                ],
            ),
            family_details: summarize(
                draft,
                &[
                    ("Father", F::FatherName),
                    ("Father's Occupation", F::FatherOccupation),
                    ("Mother", F::MotherName),
                    ("Mother's Occupation", F::MotherOccupation),
                    ("Siblings", F::Siblings),
                    ("Family Type", F::FamilyType),
                    ("Family Values", F::FamilyValues),
                    ("Family Location", F::FamilyLocation),
                    ("Native Place", F::NativePlace),
                ],
            ),
            education_details: summarize(
                draft,
                &[
                    ("Qualification", F::HighestQualification),
                    ("College", F::CollegeName),
                    ("Year", F::GraduationYear),
                ],
            ),
            professional_details: summarize(
                draft,
                &[
                    ("Occupation", F::Occupation),
                    ("Company", F::CompanyName),
                    ("Role", F::Role),
                    ("Work Mode", F::WorkMode),
                    ("Income", F::AnnualIncome),
                ],
            ),
            lifestyle_details: summarize(
                draft,
                &[
                    ("Diet", F::Diet),
                    ("Smoking", F::Smoking),
                    ("Drinking", F::Drinking),
                    ("Hobbies", F::Hobbies),
                    ("Interests", F::Interests),
                    ("Languages", F::LanguagesKnown),
                ],
            ),
            contact_details: summarize(
                draft,
                &[
                    ("Phone", F::Phone),
                    ("Email", F::Email),
                    ("Address", F::Address),
                    ("Contact Person", F::ContactPerson),
                ],
            ),
            layout: draft.layout,
        }
    }

    /// Tone the paragraph should take for the chosen layout.
    pub fn style_hint(&self) -> &'static str {
        match self.layout {
            Layout::Modern => "contemporary, direct, and confident",
            Layout::Traditional => "respectful, slightly formal, and warm",
        }
    }

    /// Short digest of the most telling details. Contact details are never
    /// included.
    pub fn highlights(&self) -> String {
        let parts: Vec<String> = [
            ("Personal traits", &self.personal_details, 100),
            ("Professional standing", &self.professional_details, 100),
            ("Educational background", &self.education_details, 70),
            ("Family context", &self.family_details, 70),
            ("Lifestyle aspects", &self.lifestyle_details, 70),
        ]
        .iter()
        .filter(|(_, text, _)| !text.is_empty())
        .map(|(label, text, limit)| format!("{}: {}", label, truncate(text, *limit)))
        .collect();

        if parts.is_empty() {
            NO_HIGHLIGHTS.to_string()
        } else {
            format!("Key highlights: {}.", parts.join("; "))
        }
    }

    pub fn system_instructions(&self) -> &'static str {
        SYSTEM_INSTRUCTIONS
    }

    /// User prompt sent to the model.
    pub fn prompt(&self) -> String {
        format!(
            "Write an introductory paragraph of 3-5 sentences for a {layout} biodata, in a {tone} tone.\n\
             {highlights}\n\n\
             Biodata details:\n\
             Personal: {personal}\n\
             Family: {family}\n\
             Education: {education}\n\
             Professional: {professional}\n\
             Lifestyle: {lifestyle}\n\n\
             Craft the introduction:",
            layout = self.layout,
            tone = self.style_hint(),
            highlights = self.highlights(),
            personal = self.personal_details,
            family = self.family_details,
            education = self.education_details,
            professional = self.professional_details,
            lifestyle = self.lifestyle_details,
        )
    }
}

fn summarize(draft: &BiodataDraft, fields: &[(&str, F)]) -> String {
    fields
        .iter()
        .filter(|(_, field)| draft.has(*field))
        .map(|(label, field)| format!("{}: {}", label, draft.field(*field).trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}
