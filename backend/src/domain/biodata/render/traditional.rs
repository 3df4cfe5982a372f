//! Traditional layout: invocation banner and a single column of details.

use super::{age_in_years, join_present, present, LayoutRenderer, SectionBuilder};
use crate::domain::biodata::{BiodataDraft, BiodataField as F, DocumentNode, Layout};

const TITLE: &str = "।। बायोडाटा ।।";
const FOOTER: &str = "Generated with ShaadiCraft";

#[derive(Debug, Clone, Copy, Default)]
pub struct TraditionalRenderer;

impl LayoutRenderer for TraditionalRenderer {
    fn layout(&self) -> Layout {
        Layout::Traditional
    }

    fn render(&self, draft: &BiodataDraft) -> DocumentNode {
        let mut children = vec![DocumentNode::Header {
            title: TITLE.to_string(),
            subtitle: None,
            photo: present(draft, F::Photo),
        }];

        if let Some(text) = present(draft, F::Introduction) {
            children.push(DocumentNode::Section {
                title: "Introduction".to_string(),
                children: vec![DocumentNode::Paragraph { text }],
            });
        }

        let sections = [
            SectionBuilder::new(draft, "Personal Information")
                .field("Full Name", F::FullName)
                .field("Date of Birth", F::DateOfBirth)
                .value("Age", age_in_years(draft))
                .field("Gender", F::Gender)
                .field("Height", F::Height)
                .field("Complexion", F::Complexion)
                .field("Blood Group", F::BloodGroup)
                .field("Marital Status", F::MaritalStatus)
                .field("Manglik Status", F::ManglikStatus)
                .value("Religion / Caste", join_present(draft, &[F::Religion, F::Caste], " / "))
                .field("Sub-caste", F::SubCaste)
                .field("Mother Tongue", F::MotherTongue)
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
            SectionBuilder::new(draft, "Education")
                .field("Degree / Highest Qualification", F::HighestQualification)
                .field("College/University", F::CollegeName)
                .field("Year of Completion", F::GraduationYear)
                .build(),
            SectionBuilder::new(draft, "Professional Details")
                .field("Occupation", F::Occupation)
                .field("Company", F::CompanyName)
                .field("Role", F::Role)
                .field("Work Mode", F::WorkMode)
                .field("Annual Income", F::AnnualIncome)
                .build(),
            SectionBuilder::new(draft, "Lifestyle & Preferences")
                .field("Diet", F::Diet)
                .field("Smoking", F::Smoking)
                .field("Drinking", F::Drinking)
                .field("Languages Known", F::LanguagesKnown)
                .value(
                    "Hobbies & Interests",
                    join_present(draft, &[F::Hobbies, F::Interests], ", "),
                )
                .build(),
            SectionBuilder::new(draft, "Contact Details")
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
        DocumentNode::root(Layout::Traditional, children)
    }
}
