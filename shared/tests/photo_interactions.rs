use crux_core::testing::AppTester;
use crux_core::Request;

use photoshare::capabilities::{NavigatorOperation, ShareError, ShareOperation, ShareOutput};
use photoshare::{App, Effect, ErrorKind, Event, Model, PhotoId, Screen};

type Tester = AppTester<App, Effect>;

fn started() -> (Tester, Model) {
    let app = Tester::default();
    let mut model = Model::default();
    app.update(Event::AppStarted, &mut model);
    (app, model)
}

fn share_request(effects: Vec<Effect>) -> Request<ShareOperation> {
    effects
        .into_iter()
        .find_map(|e| match e {
            Effect::Sharing(request) => Some(request),
            _ => None,
        })
        .expect("expected a share request")
}

fn tap(app: &Tester, model: &mut Model, id: &str) -> Vec<Effect> {
    app.update(
        Event::PhotoTapped {
            photo_id: PhotoId::new(id),
        },
        model,
    )
    .effects
}

#[test]
fn feed_and_profile_load_on_start() {
    let (app, mut model) = started();
    let view = app.view(&model);
    assert_eq!(view.screen, Screen::Feed);
    assert_eq!(view.feed.len(), 9);
    assert_eq!(view.feed[0].likes, 42);

    app.update(Event::ScreenChanged { screen: Screen::Profile }, &mut model);
    let profile = app.view(&model).profile.expect("profile on profile screen");
    assert_eq!(profile.username, "@john_doe");
    assert_eq!(profile.followers, "1.2K");
    assert_eq!(profile.following, "842");
    assert_eq!(profile.photos.len(), 6);
}

#[test]
fn tapping_a_photo_opens_detail() {
    let (app, mut model) = started();

    let effects = tap(&app, &mut model, "1");
    assert_eq!(
        model.screen,
        Screen::PhotoDetail {
            photo_id: PhotoId::new("1")
        }
    );
    let pushes: Vec<_> = effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Navigator(request) => Some(request.operation),
            _ => None,
        })
        .collect();
    assert_eq!(
        pushes,
        vec![NavigatorOperation::Push {
            screen: Screen::PhotoDetail {
                photo_id: PhotoId::new("1")
            }
        }]
    );

    let photo = app.view(&model).photo.expect("detail on detail screen");
    assert_eq!(photo.likes_text, "42 likes");
    assert!(!photo.liked);
    assert!(!photo.bookmarked);
    assert_eq!(photo.comments_header, "Comments (3)");
    assert!(model.interactions.is_tracked(&PhotoId::new("1")));
}

#[test]
fn like_toggle_is_optimistic_and_reversible() {
    let (app, mut model) = started();
    tap(&app, &mut model, "1");
    let photo_id = PhotoId::new("1");

    app.update(Event::ToggleLiked { photo_id: photo_id.clone() }, &mut model);
    let photo = app.view(&model).photo.unwrap();
    assert!(photo.liked);
    assert_eq!(photo.likes_text, "43 likes");

    app.update(Event::ToggleLiked { photo_id }, &mut model);
    let photo = app.view(&model).photo.unwrap();
    assert!(!photo.liked);
    assert_eq!(photo.likes_text, "42 likes");
}

#[test]
fn bookmark_does_not_touch_like() {
    let (app, mut model) = started();
    tap(&app, &mut model, "2");

    app.update(
        Event::ToggleBookmarked {
            photo_id: PhotoId::new("2"),
        },
        &mut model,
    );
    let photo = app.view(&model).photo.unwrap();
    assert!(photo.bookmarked);
    assert!(!photo.liked);
    assert_eq!(photo.likes_text, "128 likes");
}

#[test]
fn interactions_survive_leaving_and_reopening() {
    let (app, mut model) = started();
    tap(&app, &mut model, "1");
    app.update(
        Event::ToggleLiked {
            photo_id: PhotoId::new("1"),
        },
        &mut model,
    );

    let effects = app.update(Event::BackRequested, &mut model).effects;
    assert_eq!(model.screen, Screen::Feed);
    assert!(effects.iter().any(|e| matches!(
        e,
        Effect::Navigator(request) if request.operation == NavigatorOperation::Back
    )));

    tap(&app, &mut model, "3");
    let other = app.view(&model).photo.unwrap();
    assert!(!other.liked);
    assert_eq!(other.likes_text, "67 likes");

    app.update(Event::BackRequested, &mut model);
    tap(&app, &mut model, "1");
    let photo = app.view(&model).photo.unwrap();
    assert!(photo.liked);
    assert_eq!(photo.likes_text, "43 likes");
}

#[test]
fn unknown_photo_is_not_found() {
    let (app, mut model) = started();

    let effects = tap(&app, &mut model, "404");
    assert_eq!(model.screen, Screen::Feed);
    assert!(!effects.iter().any(|e| matches!(e, Effect::Navigator(_))));
    assert_eq!(
        model.active_error.as_ref().map(|e| e.kind),
        Some(ErrorKind::NotFound)
    );
    assert!(!model.interactions.is_tracked(&PhotoId::new("404")));
}

#[test]
fn share_sends_caption_to_share_sheet() {
    let (app, mut model) = started();
    tap(&app, &mut model, "1");

    let effects = app
        .update(
            Event::ShareRequested {
                photo_id: PhotoId::new("1"),
            },
            &mut model,
        )
        .effects;
    let mut request = share_request(effects);
    let ShareOperation::ShareText { payload } = &request.operation;
    assert!(payload.starts_with("Check out this amazing photo! Beautiful sunset"));

    let update = app
        .resolve(&mut request, Ok(ShareOutput::Shared))
        .expect("share resolves");
    for event in update.events {
        app.update(event, &mut model);
    }
    assert!(model.active_error.is_none());
}

#[test]
fn share_failure_is_not_surfaced() {
    let (app, mut model) = started();
    tap(&app, &mut model, "1");

    let effects = app
        .update(
            Event::ShareRequested {
                photo_id: PhotoId::new("1"),
            },
            &mut model,
        )
        .effects;
    let mut request = share_request(effects);
    let update = app
        .resolve(&mut request, Err(ShareError::Unavailable))
        .expect("share resolves");
    for event in update.events {
        app.update(event, &mut model);
    }
    assert!(model.active_error.is_none());
    assert!(model.interactions.is_tracked(&PhotoId::new("1")));
}

const FIXTURE: &str = r#"{
    "feed": [
        {"id": "p1", "uri": "img://p1", "likes": 1234, "user": "ann"},
        {"id": "p2", "uri": "img://p2", "likes": 7, "user": "bo"}
    ],
    "profile": {
        "name": "Ann", "username": "ann", "bio": "", "avatar_uri": "img://ann",
        "photo_count": 1, "followers": 0, "following": 0, "photos": []
    },
    "detail": {
        "uri_base": "img://full/", "user_avatar": "img://ann", "caption": "hi",
        "location": "", "timestamp": "now", "comments": []
    }
}"#;

#[test]
fn loaded_fixture_replaces_photo_data() {
    let (app, mut model) = started();

    app.update(
        Event::LibraryLoaded {
            fixture: FIXTURE.to_owned(),
        },
        &mut model,
    );
    let view = app.view(&model);
    assert_eq!(view.feed.len(), 2);
    assert_eq!(view.feed[0].id, "p1");
    assert!(model.active_error.is_none());

    tap(&app, &mut model, "p1");
    app.update(
        Event::ToggleLiked {
            photo_id: PhotoId::new("p1"),
        },
        &mut model,
    );
    let photo = app.view(&model).photo.unwrap();
    assert_eq!(photo.image_uri, "img://full/p1");
    assert_eq!(photo.likes_text, "1235 likes");
}

#[test]
fn malformed_fixture_keeps_current_data() {
    let (app, mut model) = started();

    app.update(
        Event::LibraryLoaded {
            fixture: "{}".to_owned(),
        },
        &mut model,
    );
    assert_eq!(app.view(&model).feed.len(), 9);
    assert_eq!(
        model.active_error.as_ref().map(|e| e.kind),
        Some(ErrorKind::Internal)
    );
}
