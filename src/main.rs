use anyhow::Result;
use clap::{Parser, ValueEnum};
use graph_cluster_engine::cluster::VertexClusterer;
use graph_cluster_engine::{
    data, storage, BicomponentClusterer, ClusteringConfig, EdgeBetweennessClusterer,
    LabeledGraph, VoltageClusterer, WeakComponentClusterer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Weak,
    Bicomponent,
    EdgeBetweenness,
    Voltage,
}

impl Algorithm {
    fn name(self) -> &'static str {
        match self {
            Algorithm::Weak => "weak",
            Algorithm::Bicomponent => "bicomponent",
            Algorithm::EdgeBetweenness => "edge-betweenness",
            Algorithm::Voltage => "voltage",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "graph-cluster-engine",
    about = "Cluster the vertices of a graph by connectivity, betweenness or voltage"
)]
struct Cli {
    /// Path to input edge list (.parquet, otherwise whitespace-separated text)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Clustering algorithm
    #[clap(long, value_enum, default_value = "weak")]
    algorithm: Algorithm,

    /// Treat edges as directed
    #[clap(long)]
    directed: bool,

    /// Parquet column holding edge sources
    #[clap(long, default_value = "source")]
    source_column: String,

    /// Parquet column holding edge targets
    #[clap(long, default_value = "target")]
    target_column: String,

    /// JSON file with clustering parameters
    #[clap(long)]
    config: Option<String>,

    /// Maximum number of voltage clusters
    #[clap(long)]
    clusters: Option<usize>,

    /// Edges to remove before taking components (edge-betweenness)
    #[clap(long)]
    edges_to_remove: Option<usize>,

    /// Voltage candidate splits
    #[clap(long)]
    candidates: Option<usize>,

    /// Random seed for reproducible runs
    #[clap(long)]
    seed: Option<u64>,

    /// Minimum vertex degree to keep
    #[clap(long)]
    min_degree: Option<usize>,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    /// File config (or defaults) with command-line overrides applied
    fn clustering_config(&self) -> Result<ClusteringConfig> {
        let mut config = match &self.config {
            Some(path) => ClusteringConfig::from_json_file(path)?,
            None => ClusteringConfig::default(),
        };
        if let Some(n) = self.clusters {
            config.num_clusters = n;
        }
        if let Some(n) = self.edges_to_remove {
            config.num_edges_to_remove = n;
        }
        if let Some(n) = self.candidates {
            config.num_candidates = n;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(d) = self.min_degree {
            config.min_degree = d;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = args.clustering_config()?;
    log::info!("Starting {} clustering", args.algorithm.name());
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load data
    let graph = if args.input.ends_with(".parquet") {
        data::load_edge_list(
            &args.input,
            &args.source_column,
            &args.target_column,
            args.directed,
        )?
    } else {
        data::load_text_edge_list(&args.input, args.directed)?
    };

    log::info!(
        "Loaded graph with {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );

    // 2. Drop weakly connected vertices
    let graph = if config.min_degree > 0 {
        data::filter_by_degree(&graph, config.min_degree)
    } else {
        graph
    };

    // 3. Cluster and save
    run(&graph, args.algorithm, &config, &args.output_dir)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}

fn run(
    graph: &LabeledGraph<String>,
    algorithm: Algorithm,
    config: &ClusteringConfig,
    output_dir: &str,
) -> Result<()> {
    let mut clusters = match algorithm {
        Algorithm::Weak => WeakComponentClusterer::new().extract(graph)?,
        Algorithm::Bicomponent => BicomponentClusterer::new().extract(graph)?,
        Algorithm::EdgeBetweenness => {
            let mut clusterer = EdgeBetweennessClusterer::from_config(config);
            let clusters = clusterer.extract(graph)?;
            for &e in clusterer.edges_removed() {
                if let Some((a, b)) = graph.endpoints(e) {
                    log::info!(
                        "Removed edge {:?} -- {:?}",
                        graph.label(a),
                        graph.label(b)
                    );
                }
            }
            clusters
        }
        Algorithm::Voltage => VoltageClusterer::from_config(config)?.extract(graph)?,
    };

    clusters.sort_by_size_descending();
    log::info!("Found {} clusters", clusters.len());

    storage::save_results(&clusters, algorithm.name(), output_dir)
}
