use crate::core::geo::TileCoord;

/// Anything that can produce a tile URL for a coordinate.
pub trait TileSource: Send + Sync {
    fn url(&self, coord: TileCoord) -> String;
}

/// Leaflet-style URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplateSource {
    template: String,
    subdomains: Vec<String>,
}

impl UrlTemplateSource {
    pub fn new(template: impl Into<String>, subdomains: Vec<String>) -> Self {
        Self {
            template: template.into(),
            subdomains,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Subdomain for a tile; spreads neighbouring tiles across servers.
    fn subdomain(&self, coord: TileCoord) -> &str {
        if self.subdomains.is_empty() {
            return "";
        }
        let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
        &self.subdomains[idx]
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        self.template
            .replace("{s}", self.subdomain(coord))
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_expansion() {
        let source = UrlTemplateSource::new(
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        );

        assert_eq!(
            source.url(TileCoord::new(0, 0, 1)),
            "https://a.tile.openstreetmap.org/1/0/0.png"
        );
        assert_eq!(
            source.url(TileCoord::new(1, 1, 3)),
            "https://c.tile.openstreetmap.org/3/1/1.png"
        );
    }

    #[test]
    fn test_template_without_subdomains() {
        let source = UrlTemplateSource::new(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            Vec::new(),
        );

        assert_eq!(
            source.url(TileCoord::new(5, 9, 4)),
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/4/9/5"
        );
    }
}
