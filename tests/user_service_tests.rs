use profilehub::{
    models::user::PLACEHOLDER_PICTURE,
    repositories::user_repository::SqliteUserRepository,
    services::{
        password::verify_password,
        user_service::{
            ProfileUpdateRequest, SignupRequest, UpdatePasswordRequest, UserService,
            UserServiceError,
        },
        UploadService,
    },
    test_utils::test_helpers,
};
use std::sync::Arc;

async fn service() -> UserService {
    let pool = test_helpers::create_test_db().await.unwrap();
    UserService::new(Arc::new(SqliteUserRepository::new(pool)))
}

fn signup(email: &str, username: &str, password: &str) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        password_confirm: password.to_string(),
    }
}

#[tokio::test]
async fn test_register_success() {
    let service = service().await;

    let user = service
        .register(signup("u1@gmail.com", "user1", "user123"))
        .await
        .unwrap();

    assert_eq!(user.email, "u1@gmail.com");
    assert_eq!(user.username, "user1");
    assert_eq!(user.profile_pic, PLACEHOLDER_PICTURE);
    assert_ne!(user.password_hash, "user123");
    assert!(verify_password("user123", &user.password_hash));
}

#[tokio::test]
async fn test_register_duplicates() {
    let service = service().await;
    service
        .register(signup("u1@gmail.com", "user1", "user123"))
        .await
        .unwrap();

    let dup_email = service
        .register(signup("u1@gmail.com", "someone", "user123"))
        .await;
    assert!(matches!(dup_email, Err(UserServiceError::EmailTaken)));

    let dup_username = service
        .register(signup("other@gmail.com", "user1", "user123"))
        .await;
    assert!(matches!(dup_username, Err(UserServiceError::UsernameTaken)));
}

#[tokio::test]
async fn test_register_reports_first_failing_rule() {
    let service = service().await;

    let err = service
        .register(signup("bad", "u", "12"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid email");

    let err = service
        .register(signup("new@gmail.com", "u", "12"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "User name must be greater than 1 character");

    let err = service
        .register(signup("new@gmail.com", "newuser", "12"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 7 characters");
}

#[tokio::test]
async fn test_update_profile_keeps_own_identity() {
    let service = service().await;
    let user = service
        .register(signup("u1@gmail.com", "user1", "user123"))
        .await
        .unwrap();

    let updated = service
        .update_profile(ProfileUpdateRequest {
            user_id: user.id,
            email: "u1@gmail.com".to_string(),
            username: "user1".to_string(),
            bio: "artist".to_string(),
            profession: "photography".to_string(),
            password: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.bio, "artist");
    assert_eq!(updated.profession, "photography");
    assert_eq!(updated.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_update_profile_rejects_taken_email() {
    let service = service().await;
    let user = service
        .register(signup("u1@gmail.com", "user1", "user123"))
        .await
        .unwrap();
    service
        .register(signup("u2@gmail.com", "user2", "user123"))
        .await
        .unwrap();

    let result = service
        .update_profile(ProfileUpdateRequest {
            user_id: user.id,
            email: "u2@gmail.com".to_string(),
            username: "user1".to_string(),
            bio: String::new(),
            profession: String::new(),
            password: None,
        })
        .await;

    assert!(matches!(result, Err(UserServiceError::EmailTaken)));
}

#[tokio::test]
async fn test_update_password() {
    let service = service().await;
    let user = service
        .register(signup("u1@gmail.com", "user1", "user123"))
        .await
        .unwrap();

    let mismatch = service
        .update_password(UpdatePasswordRequest {
            user_id: user.id,
            new_password: "newpassword".to_string(),
            new_password_confirm: Some("different".to_string()),
        })
        .await;
    assert!(matches!(mismatch, Err(UserServiceError::PasswordMismatch)));

    service
        .update_password(UpdatePasswordRequest {
            user_id: user.id,
            new_password: "newpassword".to_string(),
            new_password_confirm: Some("newpassword".to_string()),
        })
        .await
        .unwrap();

    let stored = service.find_user_by_id(user.id).await.unwrap().unwrap();
    assert!(verify_password("newpassword", &stored.password_hash));
    assert!(!verify_password("user123", &stored.password_hash));
}

#[tokio::test]
async fn test_profile_picture_swap_returns_previous() {
    let service = service().await;
    let user = service
        .register(signup("u1@gmail.com", "user1", "user123"))
        .await
        .unwrap();

    let previous = service
        .set_profile_picture(user.id, "uploads/1-abc.png")
        .await
        .unwrap();
    assert_eq!(previous, PLACEHOLDER_PICTURE);

    let previous = service.reset_profile_picture(user.id).await.unwrap();
    assert_eq!(previous, "uploads/1-abc.png");

    let stored = service.find_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.profile_pic, PLACEHOLDER_PICTURE);
}

#[tokio::test]
async fn test_list_and_delete_users() {
    let service = service().await;
    for i in 0..3 {
        service
            .register(signup(
                &format!("user{}@gmail.com", i),
                &format!("user{}", i),
                "user123",
            ))
            .await
            .unwrap();
    }

    let users = service.list_users(None, None).await.unwrap();
    assert_eq!(users.len(), 3);

    let page = service.list_users(Some(2), Some(1)).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].username, "user1");

    let removed = service.delete_user(users[0].id).await.unwrap();
    assert_eq!(removed.username, "user0");
    assert!(service.find_user_by_id(users[0].id).await.unwrap().is_none());
    assert!(matches!(
        service.delete_user(users[0].id).await,
        Err(UserServiceError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_deleted_account_picture_can_be_cleaned_up() {
    let service = service().await;
    let uploads_dir = tempfile::TempDir::new().unwrap();
    let uploads = UploadService::new(uploads_dir.path());
    let user = service
        .register(signup("u1@gmail.com", "user1", "user123"))
        .await
        .unwrap();

    let stored = uploads
        .store_picture(user.id, "me.png", b"png-bytes")
        .await
        .unwrap();
    service.set_profile_picture(user.id, &stored).await.unwrap();

    let removed = service.delete_user(user.id).await.unwrap();
    assert_eq!(removed.profile_pic, stored);
    assert!(uploads.remove_picture(&removed.profile_pic).await.unwrap());
    assert_eq!(std::fs::read_dir(uploads_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_update_profile_rejects_taken_username() {
    let service = service().await;
    let user = service
        .register(signup("u1@gmail.com", "user1", "user123"))
        .await
        .unwrap();
    service
        .register(signup("u2@gmail.com", "user2", "user123"))
        .await
        .unwrap();

    let result = service
        .update_profile(ProfileUpdateRequest {
            user_id: user.id,
            email: "u1@gmail.com".to_string(),
            username: "user2".to_string(),
            bio: String::new(),
            profession: String::new(),
            password: None,
        })
        .await;

    assert!(matches!(result, Err(UserServiceError::UsernameTaken)));
    let stored = service.find_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "user1");
}
