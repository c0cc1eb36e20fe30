mod in_memory_conversation_repository;
mod in_memory_vector_store;
mod qdrant_adapter;

pub use in_memory_conversation_repository::InMemoryConversationRepository;
pub use in_memory_vector_store::InMemoryVectorStore;
pub use qdrant_adapter::QdrantAdapter;
