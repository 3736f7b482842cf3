use uuid::Uuid;

use coffeechat_core::models::essay::{word_count, Essay, EssayBuffer, EssayPatch};

fn essay(content: &str, updated_at: jiff::Timestamp) -> Essay {
    Essay {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        application_id: Uuid::new_v4(),
        title: "Why us".to_string(),
        prompt: "Tell us.".to_string(),
        content: content.to_string(),
        word_limit: None,
        created_at: updated_at,
        updated_at,
    }
}

#[test]
fn word_count_splits_on_whitespace_runs() {
    assert_eq!(word_count("  a  b\tc\n"), 3);
    assert_eq!(word_count(""), 0);
    assert_eq!(word_count("one"), 1);
    assert_eq!(word_count(" \n\t "), 0);
}

#[test]
fn typing_marks_buffer_dirty_until_saved() {
    let mut buffer = EssayBuffer::new("draft", None);
    assert!(!buffer.is_dirty());

    buffer.set_content("draft two");
    assert!(buffer.is_dirty());
    assert_eq!(buffer.to_patch(), EssayPatch::content("draft two"));

    buffer.mark_saved();
    assert!(!buffer.is_dirty());
}

#[test]
fn setting_identical_content_is_not_a_change() {
    let mut buffer = EssayBuffer::new("same", None);
    buffer.set_content("same");
    assert!(!buffer.is_dirty());
}

#[test]
fn word_limit_threshold() {
    let mut buffer = EssayBuffer::new("one two three", Some(3));
    assert!(!buffer.is_over_limit());
    assert_eq!(buffer.remaining_words(), Some(0));

    buffer.set_content("one two three four");
    assert!(buffer.is_over_limit());
    assert_eq!(buffer.remaining_words(), Some(-1));

    buffer.set_word_limit(None);
    assert!(!buffer.is_over_limit());
    assert_eq!(buffer.remaining_words(), None);
}

#[test]
fn identical_patch_leaves_updated_at_alone() {
    let before = jiff::Timestamp::from_second(1_700_000_000).unwrap();
    let mut essay = essay("Same words.", before);

    let patch = EssayPatch {
        content: Some("Same words.".to_string()),
        title: Some("Why us".to_string()),
        prompt: None,
    };
    assert!(!essay.apply(&patch));
    assert_eq!(essay.updated_at, before);

    assert!(essay.apply(&EssayPatch::content("New words.")));
    assert!(essay.updated_at > before);
}
