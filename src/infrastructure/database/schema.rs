diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    attached_files (id) {
        id -> Uuid,
        file_name -> Text,
        media_type -> Text,
        byte_size -> Int8,
        storage_ref -> Text,
        content_hash -> Nullable<Text>,
        conversation_id -> Nullable<Uuid>,
        user_id -> Uuid,
        uploaded_at -> Timestamptz,
        status -> Varchar,
        status_error -> Nullable<Text>,
        total_chunks -> Nullable<Int4>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    conversations (id) {
        id -> Uuid,
        public_id -> Text,
        user_id -> Uuid,
        title -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    document_chunks (id) {
        id -> Uuid,
        file_id -> Uuid,
        conversation_id -> Uuid,
        user_id -> Uuid,
        file_name -> Text,
        chunk_index -> Int4,
        content -> Text,
        embedding -> Vector,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use pgvector::sql_types::*;

    message_embeddings (id) {
        id -> Uuid,
        message_id -> Uuid,
        conversation_id -> Uuid,
        user_id -> Uuid,
        content -> Text,
        embedding -> Vector,
        speaker_role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(attached_files -> conversations (conversation_id));
diesel::joinable!(document_chunks -> attached_files (file_id));

diesel::allow_tables_to_appear_in_same_query!(
    attached_files,
    conversations,
    document_chunks,
    message_embeddings,
);
