use serde::{Deserialize, Serialize};

pub const MAX_FULL_NAME: usize = 70;
pub const MAX_PHONE: usize = 50;
pub const MAX_EMAIL: usize = 80;
pub const MAX_IMAGE_PATH: usize = 150;
pub const MAX_DESCRIPTION: usize = 360;
pub const MAX_PUBLIC_NAME: usize = 80;
pub const MAX_PDFS: usize = 21844;
/// The PDF list is stored as JSON in a `TEXT` column.
pub const MAX_PDFS_JSON: usize = 65535;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pdf {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserContents {
    pub user_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub profile_icon: String,
    pub profile_header: String,
    pub description: String,
    pub public_name: String,
    pub pdfs: Vec<Pdf>,
}

impl UserContents {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }

    /// Field limits mirror the column widths.
    pub fn is_valid(&self) -> bool {
        self.full_name.len() < MAX_FULL_NAME
            && self.phone.len() < MAX_PHONE
            && self.email.len() < MAX_EMAIL
            && self.profile_icon.len() < MAX_IMAGE_PATH
            && self.profile_header.len() < MAX_IMAGE_PATH
            && self.description.len() < MAX_DESCRIPTION
            && self.public_name.len() < MAX_PUBLIC_NAME
            && self.pdfs.len() < MAX_PDFS
            && self.pdfs_json_len().is_some_and(|len| len < MAX_PDFS_JSON)
    }

    /// Byte length of the stored PDF list.
    fn pdfs_json_len(&self) -> Option<usize> {
        serde_json::to_string(&self.pdfs).ok().map(|json| json.len())
    }
}

/// Body of the public profile view request.
#[derive(Debug, Deserialize)]
pub struct ProfileLookup {
    pub user_id: String,
}
