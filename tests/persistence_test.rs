use demohub::application::ports::{
    CollectionConfig, ConversationRepository, RepositoryError, VectorStore, VectorStoreError,
};
use demohub::domain::{Chunk, Conversation, DocumentId, Embedding, Message};
use demohub::infrastructure::persistence::{InMemoryConversationRepository, InMemoryVectorStore};

fn chunk(text: &str) -> Chunk {
    Chunk::new(text.to_string(), DocumentId::new(), Some("Movie".to_string()), 0)
}

#[tokio::test]
async fn given_new_store_when_creating_collection_twice_then_second_call_is_noop() {
    let store = InMemoryVectorStore::new();

    assert!(!store.collection_exists().await.unwrap());
    assert!(store.create_collection(&CollectionConfig::new(3)).await.unwrap());
    assert!(!store.create_collection(&CollectionConfig::new(3)).await.unwrap());
    assert!(store.collection_exists().await.unwrap());
}

#[tokio::test]
async fn given_points_when_searching_then_returns_best_matches_first() {
    let store = InMemoryVectorStore::new();
    store.create_collection(&CollectionConfig::new(2)).await.unwrap();
    let chunks = vec![chunk("east"), chunk("north"), chunk("north-east")];
    let embeddings = vec![
        Embedding::new(vec![1.0, 0.0]),
        Embedding::new(vec![0.0, 1.0]),
        Embedding::new(vec![1.0, 1.0]),
    ];
    store.upsert(&chunks, &embeddings).await.unwrap();

    let results = store
        .search(&Embedding::new(vec![0.1, 1.0]), 2)
        .await
        .unwrap();

    let texts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
    assert_eq!(texts, vec!["north", "north-east"]);
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn given_same_chunk_id_when_upserting_again_then_replaces_point() {
    let store = InMemoryVectorStore::new();
    let mut original = chunk("draft");
    store
        .upsert(&[original.clone()], &[Embedding::new(vec![1.0, 0.0])])
        .await
        .unwrap();

    original.text = "final".to_string();
    store
        .upsert(&[original], &[Embedding::new(vec![1.0, 0.0])])
        .await
        .unwrap();

    assert_eq!(store.len().await, 1);
    let results = store.search(&Embedding::new(vec![1.0, 0.0]), 5).await.unwrap();
    assert_eq!(results[0].chunk.text, "final");
}

#[tokio::test]
async fn given_wrong_dimensions_when_upserting_then_rejects_points() {
    let store = InMemoryVectorStore::new();
    store.create_collection(&CollectionConfig::new(3)).await.unwrap();

    let result = store
        .upsert(&[chunk("short")], &[Embedding::new(vec![1.0, 0.0])])
        .await;

    assert!(matches!(result, Err(VectorStoreError::UpsertFailed(_))));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn given_bad_vector_late_in_batch_when_upserting_then_stores_nothing() {
    let store = InMemoryVectorStore::new();
    store.create_collection(&CollectionConfig::new(2)).await.unwrap();

    let result = store
        .upsert(
            &[chunk("first"), chunk("second"), chunk("third")],
            &[
                Embedding::new(vec![1.0, 0.0]),
                Embedding::new(vec![0.0, 1.0]),
                Embedding::new(vec![1.0, 1.0, 1.0]),
            ],
        )
        .await;

    assert!(matches!(result, Err(VectorStoreError::UpsertFailed(_))));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn given_mismatched_batches_when_upserting_then_rejects_them() {
    let store = InMemoryVectorStore::new();

    let result = store.upsert(&[chunk("a"), chunk("b")], &[Embedding::new(vec![1.0])]).await;

    assert!(matches!(result, Err(VectorStoreError::UpsertFailed(_))));
}

#[tokio::test]
async fn given_missing_collection_when_searching_then_returns_nothing() {
    let store = InMemoryVectorStore::new();

    let results = store.search(&Embedding::new(vec![1.0]), 3).await.unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn given_conversation_when_appending_then_returns_latest_messages_oldest_first() {
    let repository = InMemoryConversationRepository::new();
    let conversation = Conversation::new();
    repository.create_conversation(&conversation).await.unwrap();

    for i in 0..4 {
        repository
            .append_message(&Message::user(conversation.id, format!("message {}", i)))
            .await
            .unwrap();
    }

    let messages = repository.get_messages(conversation.id, 2).await.unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["message 2", "message 3"]);

    let stored = repository
        .get_conversation(conversation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.messages.len(), 4);
    assert!(stored.updated_at >= stored.created_at);
}

#[tokio::test]
async fn given_existing_conversation_when_creating_again_then_rejects_duplicate() {
    let repository = InMemoryConversationRepository::new();
    let conversation = Conversation::new();
    repository.create_conversation(&conversation).await.unwrap();

    let result = repository.create_conversation(&conversation).await;

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
}

#[tokio::test]
async fn given_unknown_conversation_when_appending_then_returns_not_found() {
    let repository = InMemoryConversationRepository::new();
    let stray = Conversation::new();

    let append = repository
        .append_message(&Message::assistant(stray.id, "hello"))
        .await;
    let read = repository.get_messages(stray.id, 10).await;

    assert!(matches!(append, Err(RepositoryError::NotFound(_))));
    assert!(matches!(read, Err(RepositoryError::NotFound(_))));
    assert!(repository.get_conversation(stray.id).await.unwrap().is_none());
}
