// Test helper functions

use siteidx::core::config::Config;
use siteidx::core::corpus::ContentSite;
use siteidx::core::indexer::IndexingPipeline;
use siteidx::core::storage::TantivyLifecycle;
use siteidx::core::types::IndexStats;

use crate::common::TestSite;

/// Configuration pointing at `site` with the index inside the site root
#[allow(dead_code)]
pub fn test_config(site: &TestSite) -> Config {
    Config {
        source_dir: site.path().to_path_buf(),
        index_dir: site.index_dir(),
        writer_memory_mb: 15,
        ..Default::default()
    }
}

/// Run the pipeline over `site` with the default mapping
#[allow(dead_code)]
pub fn index_site(site: &TestSite) -> IndexStats {
    let config = test_config(site);
    let corpus = ContentSite::from_config(&config);
    let lifecycle = TantivyLifecycle::from_config(&config);

    IndexingPipeline::new(config)
        .run(&corpus, &lifecycle)
        .expect("indexing should succeed")
}
