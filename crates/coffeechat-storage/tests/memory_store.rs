use uuid::Uuid;

use coffeechat_core::directory::{OrganizationLookup, ProfileLookup};
use coffeechat_core::models::chat_session::ChatSession;
use coffeechat_core::models::essay::{Essay, EssayPatch};
use coffeechat_core::models::message::{Attachment, EditKind, Message, PendingEdit};
use coffeechat_core::models::organization::{OrgType, Organization};
use coffeechat_storage::essays::EssayStore;
use coffeechat_storage::memory::MemoryStore;
use coffeechat_storage::sessions::ChatSessionStore;

fn org(name: &str) -> Organization {
    Organization {
        id: Uuid::new_v4(),
        name: name.to_string(),
        org_type: OrgType::Club,
        description: None,
        application_requirements: None,
        application_deadline: None,
        contact_email: None,
        website_url: None,
    }
}

fn essay(content: &str) -> Essay {
    let now = jiff::Timestamp::now();
    Essay {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        application_id: Uuid::new_v4(),
        title: "Why us".to_string(),
        prompt: "Tell us why.".to_string(),
        content: content.to_string(),
        word_limit: Some(250),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn saved_messages_load_back_in_order() {
    let store = MemoryStore::new();
    let (user, app) = (Uuid::new_v4(), Uuid::new_v4());

    let mut session = ChatSession::fresh(user, app);
    session.append(Message::user("Help me start.")).unwrap();
    session
        .append(Message::assistant(
            "Here is a draft.",
            Some(Attachment::PendingEdit(PendingEdit {
                edit_kind: EditKind::Write,
                proposed_content: "Draft.".to_string(),
            })),
        ))
        .unwrap();

    let id = store.save(user, app, None, &session.messages).await.unwrap();
    let loaded = store.load(user, app).await.unwrap().unwrap();

    assert_eq!(loaded.session_id, Some(id));
    assert_eq!(loaded.messages, session.messages);
    assert_eq!(loaded.pending_edit_count(), 1);
}

#[tokio::test]
async fn later_saves_reuse_the_session_id() {
    let store = MemoryStore::new();
    let (user, app) = (Uuid::new_v4(), Uuid::new_v4());
    let mut messages = ChatSession::fresh(user, app).messages;

    let first = store.save(user, app, None, &messages).await.unwrap();
    messages.push(Message::user("Shorter, please."));
    let second = store.save(user, app, Some(first), &messages).await.unwrap();

    assert_eq!(first, second);
    let loaded = store.load(user, app).await.unwrap().unwrap();
    assert_eq!(loaded.messages.len(), 2);
}

#[tokio::test]
async fn missing_session_loads_as_none() {
    let store = MemoryStore::new();
    assert!(store
        .load(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn essay_patch_updates_only_given_fields() {
    let store = MemoryStore::new();
    let original = essay("One two three.");
    store.insert_essay(original.clone()).await;

    let updated = store
        .update_essay(original.user_id, original.id, &EssayPatch::content("Four five."))
        .await
        .unwrap();

    assert_eq!(updated.content, "Four five.");
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.word_count(), 2);
}

#[tokio::test]
async fn unknown_essay_is_not_found() {
    let store = MemoryStore::new();
    let err = store.essay(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn essays_are_invisible_to_other_users() {
    let store = MemoryStore::new();
    let owned = essay("Mine.");
    store.insert_essay(owned.clone()).await;
    let stranger = Uuid::new_v4();

    assert!(store.essay(stranger, owned.id).await.unwrap_err().is_not_found());
    let err = store
        .update_essay(stranger, owned.id, &EssayPatch::content("Theirs."))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(store.essay(owned.user_id, owned.id).await.unwrap().content, "Mine.");
}

#[tokio::test]
async fn organization_search_puts_exact_match_first() {
    let store = MemoryStore::new();
    store.insert_organization(org("Robotics Club Alumni")).await;
    store.insert_organization(org("Chess Club")).await;
    store.insert_organization(org("Robotics Club")).await;

    let hits = store.search_organizations("robotics club").await.unwrap();
    let names: Vec<_> = hits.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Robotics Club", "Robotics Club Alumni"]);
}

#[tokio::test]
async fn absent_profile_is_none() {
    let store = MemoryStore::new();
    assert!(store.profile(Uuid::new_v4()).await.unwrap().is_none());
}
