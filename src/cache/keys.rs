//! Cache key builders for the site's entity types.
//!
//! Every key is `namespace:discriminant` so a write can drop all cached views
//! of one entity type with a single prefix invalidation.

pub const BLOG_NAMESPACE: &str = "blog:";
pub const TESTIMONIALS_NAMESPACE: &str = "testimonials:";
pub const CASE_STUDY_NAMESPACE: &str = "case-study:";
pub const CASE_STUDIES_NAMESPACE: &str = "case-studies:";
pub const DRAFT_NAMESPACE: &str = "draft:";

fn published_or_all(published: bool) -> &'static str {
    if published {
        "published"
    } else {
        "all"
    }
}

pub fn blog_post(slug: &str) -> String {
    format!("blog:post:{}", slug)
}

pub fn blog_posts(published: bool) -> String {
    format!("blog:posts:{}", published_or_all(published))
}

pub fn testimonials(approved: bool, featured: bool) -> String {
    format!(
        "testimonials:{}:{}",
        if approved { "approved" } else { "all" },
        if featured { "featured" } else { "all" }
    )
}

pub fn case_study(slug: &str) -> String {
    format!("case-study:{}", slug)
}

pub fn case_studies(published: bool) -> String {
    format!("case-studies:{}", published_or_all(published))
}

pub fn user(email: &str) -> String {
    format!("user:{}", email)
}

pub fn promo_code(code: &str) -> String {
    format!("promo:{}", code)
}

pub fn categories() -> String {
    "blog:categories".to_string()
}

pub fn tags() -> String {
    "blog:tags".to_string()
}

/// Key for the list of drafts not yet completed.
pub fn incomplete_drafts() -> String {
    "draft:incomplete".to_string()
}

/// Key for a draft looked up by its resume token.
pub fn draft_by_token(token: &str) -> String {
    format!("draft:token:{}", token)
}
