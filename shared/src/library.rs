//! Read-only photo data for the feed, profile and detail screens.
//!
//! There is no backend; [`SampleLibrary`] stands in for one. Callers only rely
//! on [`PhotoSource`], which hands out ordered snapshots and offers no way to
//! mutate them.

use serde::{Deserialize, Serialize};

use crate::event::PhotoId;
use crate::SHARE_MESSAGE_PREFIX;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PhotoRecord {
    pub id: PhotoId,
    pub uri: String,
    pub likes: u64,
    pub user: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub user: String,
    pub text: String,
    pub avatar: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PhotoDetail {
    pub id: PhotoId,
    pub uri: String,
    pub user: String,
    pub user_avatar: String,
    pub likes: u64,
    pub caption: String,
    pub location: String,
    pub timestamp: String,
    pub comments: Vec<Comment>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProfileSummary {
    pub name: String,
    pub username: String,
    pub bio: String,
    pub avatar_uri: String,
    pub photo_count: u64,
    pub followers: u64,
    pub following: u64,
    pub photos: Vec<PhotoRecord>,
}

pub trait PhotoSource {
    /// Feed photos, newest first.
    fn feed(&self) -> Vec<PhotoRecord>;
    fn profile(&self) -> ProfileSummary;
    fn detail(&self, id: &PhotoId) -> Option<PhotoDetail>;
}

/// Caption, comments and the like shared by every detail page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DetailTemplate {
    /// The photo id is appended to this.
    pub uri_base: String,
    pub user_avatar: String,
    pub caption: String,
    pub location: String,
    pub timestamp: String,
    pub comments: Vec<Comment>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SampleLibrary {
    feed: Vec<PhotoRecord>,
    profile: ProfileSummary,
    detail: DetailTemplate,
}

impl SampleLibrary {
    pub fn new(feed: Vec<PhotoRecord>, profile: ProfileSummary, detail: DetailTemplate) -> Self {
        Self {
            feed,
            profile,
            detail,
        }
    }

    /// Loads a fixture exported by the shell or a test.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn find(&self, id: &PhotoId) -> Option<&PhotoRecord> {
        self.feed
            .iter()
            .chain(self.profile.photos.iter())
            .find(|record| &record.id == id)
    }
}

impl PhotoSource for SampleLibrary {
    fn feed(&self) -> Vec<PhotoRecord> {
        self.feed.clone()
    }

    fn profile(&self) -> ProfileSummary {
        self.profile.clone()
    }

    fn detail(&self, id: &PhotoId) -> Option<PhotoDetail> {
        let record = self.find(id)?;
        Some(PhotoDetail {
            id: id.clone(),
            uri: format!("{}{}", self.detail.uri_base, id),
            user: record.user.clone(),
            user_avatar: self.detail.user_avatar.clone(),
            likes: record.likes,
            caption: self.detail.caption.clone(),
            location: self.detail.location.clone(),
            timestamp: self.detail.timestamp.clone(),
            comments: self.detail.comments.clone(),
        })
    }
}

fn picsum(size: u32, seed: &str) -> String {
    format!("https://picsum.photos/{size}/{size}?random={seed}")
}

fn record(id: &str, likes: u64, user: &str) -> PhotoRecord {
    PhotoRecord {
        id: PhotoId::new(id),
        uri: picsum(400, id),
        likes,
        user: user.into(),
    }
}

fn comment(id: &str, user: &str, text: &str) -> Comment {
    Comment {
        id: id.into(),
        user: user.into(),
        text: text.into(),
        avatar: picsum(100, &format!("user{id}")),
    }
}

impl Default for SampleLibrary {
    fn default() -> Self {
        let feed = vec![
            record("1", 42, "john_doe"),
            record("2", 128, "jane_smith"),
            record("3", 67, "mike_photos"),
            record("4", 234, "sarah_lens"),
            record("5", 89, "alex_cam"),
            record("6", 156, "emma_pics"),
            record("7", 92, "john_doe"),
            record("8", 203, "jane_smith"),
            record("9", 45, "mike_photos"),
        ];

        let profile = ProfileSummary {
            name: "John Doe".into(),
            username: "john_doe".into(),
            bio: "📸 Photography enthusiast | 🌍 Travel lover | ✨ Capturing moments".into(),
            avatar_uri: picsum(200, "user"),
            photo_count: 127,
            followers: 1_200,
            following: 842,
            photos: feed.iter().take(6).cloned().collect(),
        };

        let detail = DetailTemplate {
            uri_base: "https://picsum.photos/800/800?random=".into(),
            user_avatar: picsum(100, "user"),
            caption: "Beautiful sunset captured during my evening walk 🌅✨ #photography #nature #sunset"
                .into(),
            location: "San Francisco, CA".into(),
            timestamp: "2 hours ago".into(),
            comments: vec![
                comment("1", "jane_smith", "Absolutely stunning! 😍"),
                comment("2", "mike_photos", "What camera did you use?"),
                comment("3", "sarah_lens", "This is amazing! 📸"),
            ],
        };

        Self::new(feed, profile, detail)
    }
}

#[must_use]
pub fn share_message(caption: &str) -> String {
    format!("{SHARE_MESSAGE_PREFIX} {caption}")
}
