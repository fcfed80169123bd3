//! # Laboratory Profile
//!
//! Everything printed on a report that belongs to the laboratory rather than
//! to the test: letterhead, accreditation caption, footer lines, terms and
//! conditions, signatories and equipment defaults.
//!
//! [`LabProfile::default`] is the standard Vitrag Associates profile. A TOML
//! file may override any subset of the fields:
//!
//! ```toml
//! company = "ACME MATERIALS LAB"
//! accreditation = { mark = "NABL", certificate = "TC-0001" }
//!
//! [equipment]
//! calibration_due = "15/03/2027"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{LabError, LabResult};
use crate::layout::{Accreditation, Footer, Header, PageFrame, Signatory};

/// Equipment and method defaults used when a record leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentDefaults {
    pub machine: String,
    pub capacity_range: String,
    pub calibration_due: String,
    pub test_method: String,
    pub environment: String,
    pub specimen_condition: String,
}

impl Default for EquipmentDefaults {
    fn default() -> Self {
        EquipmentDefaults {
            machine: "CTM (2000KN)".to_string(),
            capacity_range: "2000KN".to_string(),
            calibration_due: "01/07/2026".to_string(),
            test_method: "IS 516 (Part 1/Sec 1):2021".to_string(),
            environment: "Not Applicable".to_string(),
            specimen_condition: "Acceptable".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabProfile {
    pub company: String,
    pub subtitle: String,
    pub logo_placeholder: String,
    pub accreditation: Option<Accreditation>,
    pub report_title: String,
    pub footer: Footer,
    pub end_marker: String,
    pub terms_heading: String,
    pub terms: Vec<String>,
    /// Used when the record carries no reviewer
    pub reviewer: Signatory,
    pub authorizer: Signatory,
    pub equipment: EquipmentDefaults,
}

impl Default for LabProfile {
    fn default() -> Self {
        let lab = "Vitrag Associates LLP lab";
        LabProfile {
            company: "VITRAG ASSOCIATES LLP".to_string(),
            subtitle: "(Construction Material Testing Laboratory)".to_string(),
            logo_placeholder: "LOGO".to_string(),
            accreditation: Some(Accreditation {
                mark: "NABL".to_string(),
                certificate: "TC-15756".to_string(),
            }),
            report_title: "TEST REPORT".to_string(),
            footer: Footer {
                address: "34A/26 West, New Pachha Peth, Ashok Chowk, Solapur".to_string(),
                contact: "Mob. No.-9552529235, 8830263787, E-mail: vitragassociates3@gmail.com".to_string(),
                document_code: "VA/TR/I-3/24".to_string(),
                issue: "Issue No. 03".to_string(),
            },
            end_marker: "X----------X----------X----------X----------X----------END OF REPORT\
                         ----------X----------X----------X----------X----------X"
                .to_string(),
            terms_heading: "Terms & Conditions :-".to_string(),
            terms: vec![
                format!("1) Samples were not drawn by {}.", lab),
                format!("2) The Test Reports & Results pertain to Sample/ Samples of material received by {}.", lab),
                format!(
                    "3) The Test Report cannot be reproduced without the written approval of CEO/QM of {}.",
                    lab
                ),
                "4) Any change/ correction/ alteration to the Test Report shall be invalid.".to_string(),
                format!(
                    "5) The role VAs is restricted to testing of the material sample as received in the laboratory. \
                     {0} or any of its employees shall not be liable for any dispute/ litigation arising between \
                     the customer & Third Party on account of test results. {0} shall not interact with any Third \
                     Party in this regard.",
                    lab
                ),
                format!(
                    "6) The CEO of {} may make necessary changes to the terms & conditions without any prior notice.",
                    lab
                ),
            ],
            reviewer: Signatory {
                name: "Lalita S. Dussa".to_string(),
                designation: "Quality Manager".to_string(),
                qualifications: vec!["B.Tech.(Civil)".to_string()],
            },
            authorizer: Signatory {
                name: "Mr. Prakarsh A Sangave".to_string(),
                designation: "Chief Executive Officer".to_string(),
                qualifications: vec![
                    "M.E(Civil-Structures)".to_string(),
                    "MTech (Civil-Geotechnical), M.I.E, F.I.E.".to_string(),
                ],
            },
            equipment: EquipmentDefaults::default(),
        }
    }
}

impl LabProfile {
    /// Parse a profile from TOML text. Missing keys keep their defaults.
    pub fn from_toml(text: &str, origin: &str) -> LabResult<Self> {
        toml::from_str(text).map_err(|e| LabError::config_error(origin, e.to_string()))
    }

    /// Load a profile file.
    pub fn load(path: &Path) -> LabResult<Self> {
        let path_str = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LabError::file_error("read", &path_str, e.to_string()))?;
        let profile = Self::from_toml(&text, &path_str)?;
        debug!(path = %path_str, company = %profile.company, "loaded lab profile");
        Ok(profile)
    }

    /// Load `path` when given, otherwise use the built-in profile.
    pub fn load_or_default(path: Option<&Path>) -> LabResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn header(&self) -> Header {
        Header {
            company: self.company.clone(),
            subtitle: self.subtitle.clone(),
            logo_placeholder: self.logo_placeholder.clone(),
            accreditation: self.accreditation.clone(),
        }
    }

    /// Letterhead, footer and end marker for the layout engine
    pub fn frame(&self) -> PageFrame {
        PageFrame {
            header: self.header(),
            footer: self.footer.clone(),
            end_marker: self.end_marker.clone(),
        }
    }
}
