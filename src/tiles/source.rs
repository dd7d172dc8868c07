use crate::core::config::TileProvider;

/// Anything that can produce encoded tile bytes for a tile address.
///
/// `None` means there is no tile at these coordinates; it is not an error.
/// Implementations may block. Retries and persistence are their business.
pub trait TileSource: Send + Sync {
    fn fetch(&self, zoom: u8, x: u32, y: u32) -> Option<Vec<u8>>;
}

impl<F> TileSource for F
where
    F: Fn(u8, u32, u32) -> Option<Vec<u8>> + Send + Sync,
{
    fn fetch(&self, zoom: u8, x: u32, y: u32) -> Option<Vec<u8>> {
        self(zoom, x, y)
    }
}

/// Source used when no background tiles should be drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTileSource;

impl TileSource for EmptyTileSource {
    fn fetch(&self, _zoom: u8, _x: u32, _y: u32) -> Option<Vec<u8>> {
        None
    }
}

/// Builds tile URLs from a [`TileProvider`] and hands them to a
/// caller-supplied transport.
pub struct ProviderTileSource<T> {
    provider: TileProvider,
    transport: T,
}

impl<T> ProviderTileSource<T>
where
    T: Fn(&str) -> Option<Vec<u8>> + Send + Sync,
{
    pub fn new(provider: TileProvider, transport: T) -> Self {
        Self {
            provider,
            transport,
        }
    }

    pub fn provider(&self) -> &TileProvider {
        &self.provider
    }
}

impl<T> TileSource for ProviderTileSource<T>
where
    T: Fn(&str) -> Option<Vec<u8>> + Send + Sync,
{
    fn fetch(&self, zoom: u8, x: u32, y: u32) -> Option<Vec<u8>> {
        let url = self.provider.url(zoom, x, y)?;
        log::trace!("fetch tile {}/{}/{} from {}", zoom, x, y, url);
        (self.transport)(&url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TileProviderProfile;
    use std::sync::Mutex;

    #[test]
    fn test_closure_source() {
        let source = |z: u8, x: u32, y: u32| Some(vec![z, x as u8, y as u8]);
        assert_eq!(source.fetch(3, 4, 5), Some(vec![3, 4, 5]));
        assert_eq!(EmptyTileSource.fetch(0, 0, 0), None);
    }

    #[test]
    fn test_provider_source_uses_urls() {
        let seen = Mutex::new(Vec::new());
        let source = ProviderTileSource::new(TileProviderProfile::OpenStreetMap.resolve(), |url: &str| {
            seen.lock().unwrap().push(url.to_string());
            Some(url.as_bytes().to_vec())
        });
        assert!(source.fetch(2, 1, 1).is_some());
        // beyond the provider's max zoom no request is made
        assert!(source.fetch(25, 1, 1).is_none());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], "https://c.tile.openstreetmap.org/2/1/1.png");
    }

    #[test]
    fn test_provider_without_pattern_yields_nothing() {
        let source = ProviderTileSource::new(TileProviderProfile::None.resolve(), |_: &str| {
            Some(vec![1])
        });
        assert!(source.fetch(1, 0, 0).is_none());
    }
}
