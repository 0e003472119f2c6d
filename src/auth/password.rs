//! bcrypt hashing, run on the blocking pool so it never stalls the runtime.

use crate::error::{AppError, AppResult};

pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    Ok(hashed)
}

pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))??;

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("correct horse".into(), 4)
            .await
            .unwrap();

        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("battery staple".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        let err = verify_password("anything".into(), "not-a-bcrypt-hash".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Hashing(_)));
    }
}
