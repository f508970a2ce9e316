// Relational card storage: promoted columns on `card`, every vCard
// property as an ordered row of `card_properties`.

diesel::table! {
    card (id) {
        id -> Uuid,
        parent_path -> Text,
        name -> Text,
        uid -> Text,
        #[sql_name = "fn"]
        fn_ -> Text,
        kind -> Text,
    }
}

diesel::table! {
    card_properties (id) {
        id -> Uuid,
        card_id -> Uuid,
        position -> Int4,
        group_name -> Nullable<Text>,
        name -> Text,
        value -> Text,
        params -> Nullable<Text>,
    }
}

diesel::joinable!(card_properties -> card (card_id));

diesel::allow_tables_to_appear_in_same_query!(card, card_properties);
