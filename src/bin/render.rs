use std::{net::SocketAddr, path::PathBuf, thread, time::Duration};

use actix_files::Files;
use actix_web::{middleware, App, HttpServer};
use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;

use flora_hotel::renderer::{render_all, watch, RendererConfig};

#[derive(Debug, Parser)]
#[command(about = "Render the static site and optionally watch and serve it")]
struct Args {
    /// Directory of JSON and YAML data files
    #[arg(long, default_value = "data")]
    data: PathBuf,
    /// Directory of Jinja templates
    #[arg(long, default_value = "templates")]
    templates: PathBuf,
    /// Output directory
    #[arg(long, default_value = "site")]
    output: PathBuf,
    /// Rebuild when templates or data change
    #[arg(long)]
    watch: bool,
    /// Serve the output directory for preview (implies --watch)
    #[arg(long)]
    serve: bool,
    #[arg(long, default_value = "127.0.0.1:5500")]
    addr: SocketAddr,
    #[arg(long, default_value_t = 5)]
    debounce_secs: u64,
}

impl Args {
    fn to_config(&self) -> RendererConfig {
        RendererConfig {
            data_dir: self.data.clone(),
            templates_dir: self.templates.clone(),
            output_dir: self.output.clone(),
            debounce: Duration::from_secs(self.debounce_secs),
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();
    let config = args.to_config();

    // Initial render on startup
    if let Err(e) = render_all(&config, None) {
        log::error!("initial build failed: {e}");
    }

    if !(args.watch || args.serve) {
        return Ok(());
    }

    let watch_config = config.clone();
    let watcher = thread::spawn(move || {
        if let Err(e) = watch(&watch_config) {
            log::error!("watcher stopped: {e}");
        }
    });

    if !args.serve {
        if watcher.join().is_err() {
            log::error!("watcher thread panicked");
        }
        return Ok(());
    }

    log::info!("Serving {} at http://{}", config.output_dir.display(), args.addr);
    let output_dir = config.output_dir.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .service(Files::new("/", output_dir.clone()).index_file("index.html"))
    })
    .bind(args.addr)?
    .run()
    .await
}
