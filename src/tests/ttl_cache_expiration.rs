#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::cache::TtlCache;

    #[tokio::test(start_paused = true)]
    async fn entry_is_served_until_ttl_then_behaves_as_missing() {
        let cache: TtlCache<String> = TtlCache::new("test");
        cache.set("k", "v".to_owned(), Duration::from_secs(30)).await;

        assert_eq!(cache.get("k").await.as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));

        // expiry instant itself is already a miss
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("k").await, None);

        // expired entry lingers in storage until replaced or deleted
        assert_eq!(cache.stored().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn set_after_expiry_starts_a_new_window() {
        let cache: TtlCache<u32> = TtlCache::new("test");
        cache.set("k", 1, Duration::from_secs(5)).await;
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.get("k").await, None);

        cache.set("k", 2, Duration::from_secs(5)).await;
        assert_eq!(cache.get("k").await, Some(2));
        assert_eq!(cache.stored().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_expire_and_delete_independently() {
        let cache: TtlCache<&'static str> = TtlCache::new("test");
        cache.set("short", "a", Duration::from_secs(1)).await;
        cache.set("long", "b", Duration::from_secs(60)).await;
        cache.set("other", "c", Duration::from_secs(60)).await;

        tokio::time::advance(Duration::from_secs(2)).await;
        cache.delete("other").await;

        assert_eq!(cache.get("short").await, None);
        assert_eq!(cache.get("long").await, Some("b"));
        assert_eq!(cache.get("other").await, None);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let cache: TtlCache<u8> = TtlCache::new("test");
        let clone = cache.clone();
        clone.set("k", 7, Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await, Some(7));
    }
}
