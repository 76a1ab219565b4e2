// Run with, for instance:
// mpirun -n 2 cargo run --features mpi --example hybrid -- config.json
use mpintir::comm::{Communicator, MpiComm};
use mpintir::config::HybridConfig;
use mpintir::integrators::hybrid;
use mpintir::IntegrationRequest;
use std::env;

fn main() -> mpintir::Result<()> {
    env_logger::init();

    let universe = mpi::initialize()
        .ok_or_else(|| mpintir::Error::Communication("MPI is already initialized".into()))?;
    let comm = MpiComm::new(universe.world());

    let config = match env::args().nth(1) {
        Some(path) => HybridConfig::from_json_file(path)?,
        None => HybridConfig::default(),
    };

    let request =
        IntegrationRequest::new(3, vec![-2.0, -2.0, 0.0], vec![4.0, 6.0, 3.0], 100.0);
    let integrand = |x: &[f64]| x[0] + x[1] + x[2];

    let root_request = if comm.is_root() { Some(&request) } else { None };
    let result = hybrid::integrate(&comm, &integrand, root_request, &config)?;

    if comm.is_root() {
        println!("integral: {}", result);
    }

    Ok(())
}
