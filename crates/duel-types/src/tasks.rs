//! The static catalog of daily task codes. Task codes are what gets stored;
//! display names are a lookup so copy changes never touch stored rows.

use crate::schedule::WINDOW_DAYS;

pub static TASKS: &[(&str, &str)] = &[
    ("mk_post_video", "Post a promotional video on LinkedIn / X"),
    ("mk_testimonial", "Share a customer testimonial or case study publicly"),
    ("mk_milestone", "Announce a milestone on social media"),
    ("mk_poll", "Create a poll or question post"),
    ("mk_bts", "Post a behind-the-scenes team update"),
    ("pr_launch_feature", "Launch a new feature"),
    ("pr_changelog", "Publish a changelog/update log"),
    ("pr_landing", "Add or improve a landing page"),
    ("pr_demo_video", "Run a small product demo video"),
    ("pr_store_update", "Push an update to App Store / Play Store"),
    ("ua_10_signups", "Get 10 new signups"),
    ("ua_close_customer", "Close 1 paying customer"),
    ("ua_newsletter", "Send a customer newsletter"),
    ("ua_webinar", "Host a live demo / webinar"),
    ("ua_3_testimonials", "Collect 3 new testimonials"),
    ("cc_join_group_intro", "Join a Slack/Discord group and post an intro"),
    ("cc_blog_post", "Write a short blog / Medium post"),
    ("cc_product_hunt", "Publish on Product Hunt / Indie Hackers"),
    ("cc_collab_shoutout", "Collaborate on a shoutout post"),
    ("cc_featured", "Get featured in a newsletter / podcast"),
];

/// Display name for a task code. Unknown codes fall back to the code itself
/// so old rows still render after a catalog change.
pub fn task_name(code: &str) -> &str {
    TASKS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Draw one distinct task code per window day, for seeding a freshly
/// accepted challenge.
pub fn draw_task_codes() -> Vec<&'static str> {
    let mut rng = rand::rng();
    rand::seq::index::sample(&mut rng, TASKS.len(), WINDOW_DAYS as usize)
        .iter()
        .map(|i| TASKS[i].0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_and_unknown_codes() {
        assert_eq!(task_name("ua_10_signups"), "Get 10 new signups");
        assert_eq!(task_name("no_such_code"), "no_such_code");
    }

    #[test]
    fn draw_yields_three_distinct_codes() {
        for _ in 0..50 {
            let codes = draw_task_codes();
            assert_eq!(codes.len(), 3);
            assert_ne!(codes[0], codes[1]);
            assert_ne!(codes[1], codes[2]);
            assert_ne!(codes[0], codes[2]);
            for c in codes {
                assert!(TASKS.iter().any(|(code, _)| *code == c));
            }
        }
    }
}
