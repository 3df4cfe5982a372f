//! Modern layout: name banner, "About Me" and titled field sections.

use super::{age_in_years, join_present, present, LayoutRenderer, SectionBuilder};
use crate::domain::biodata::{BiodataDraft, BiodataField as F, DocumentNode, Layout};

const NAME_PLACEHOLDER: &str = "Full Name";
const FOOTER: &str = "Biodata generated by ShaadiCraft";

#[derive(Debug, Clone, Copy, Default)]
pub struct ModernRenderer;

impl LayoutRenderer for ModernRenderer {
    fn layout(&self) -> Layout {
        Layout::Modern
    }

    fn render(&self, draft: &BiodataDraft) -> DocumentNode {
        let mut children = vec![header(draft)];

        if let Some(text) = present(draft, F::Introduction) {
            children.push(DocumentNode::Section {
                title: "About Me".to_string(),
                children: vec![DocumentNode::Paragraph { text }],
            });
        }

        let sections = [
            SectionBuilder::new(draft, "Personal Information")
                .field("Date of Birth", F::DateOfBirth)
                .value("Age", age_in_years(draft))
                .field("Gender", F::Gender)
                .field("Height", F::Height)
                .field("Complexion", F::Complexion)
                .field("Blood Group", F::BloodGroup)
                .field("Marital Status", F::MaritalStatus)
                .field("Manglik Status", F::ManglikStatus)
                .field("Religion", F::Religion)
                .field("Caste", F::Caste)
                .field("Sub-caste", F::SubCaste)
                .field("Mother Tongue", F::MotherTongue)
                .build(),
            SectionBuilder::new(draft, "Educational Background")
                .field("Degree / Highest Qualification", F::HighestQualification)
                .field("College/University", F::CollegeName)
                .field("Year of Completion", F::GraduationYear)
                .build(),
            SectionBuilder::new(draft, "Family Background")
                .field("Father's Name", F::FatherName)
                .field("Father's Occupation", F::FatherOccupation)
                .field("Mother's Name", F::MotherName)
                .field("Mother's Occupation", F::MotherOccupation)
                .field("Siblings", F::Siblings)
                .field("Family Type", F::FamilyType)
                .field("Family Values", F::FamilyValues)
                .field("Family Location", F::FamilyLocation)
                .field("Native Place", F::NativePlace)
                .build(),
            SectionBuilder::new(draft, "Professional Details")
                .field("Occupation", F::Occupation)
                .field("Role / Designation", F::Role)
                .field("Company / Organization", F::CompanyName)
                .field("Work Mode", F::WorkMode)
                .field("Annual Income", F::AnnualIncome)
                .build(),
            SectionBuilder::new(draft, "Lifestyle & Preferences")
                .field("Dietary Preferences", F::Diet)
                .field("Smoking Habits", F::Smoking)
                .field("Drinking Habits", F::Drinking)
                .field("Languages Known", F::LanguagesKnown)
                .field("Hobbies", F::Hobbies)
                .field("Interests", F::Interests)
                .build(),
            SectionBuilder::new(draft, "Contact Information")
                .field("Mobile", F::Phone)
                .field("Email", F::Email)
                .field("Current Address", F::Address)
                .field("Contact Person", F::ContactPerson)
                .build(),
        ];
        children.extend(sections.into_iter().flatten());

        children.push(DocumentNode::Footer {
            text: FOOTER.to_string(),
        });
        DocumentNode::root(Layout::Modern, children)
    }
}

fn header(draft: &BiodataDraft) -> DocumentNode {
    let subtitle = join_present(draft, &[F::Occupation, F::Role], ", ");
    DocumentNode::Header {
        title: present(draft, F::FullName).unwrap_or_else(|| NAME_PLACEHOLDER.to_string()),
        subtitle: (!subtitle.is_empty()).then_some(subtitle),
        photo: present(draft, F::Photo),
    }
}
