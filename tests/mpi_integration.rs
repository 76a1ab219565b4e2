// Must be run with mpirun, for instance:
// mpirun -n 4 cargo test --features mpi --test mpi_integration -- --nocapture

#[cfg(feature = "mpi")]
mod mpi_tests {
    use mpintir::comm::{Communicator, MpiComm};
    use mpintir::config::HybridConfig;
    use mpintir::integrators::hybrid;
    use mpintir::IntegrationRequest;

    fn integrand(x: &[f64]) -> f64 {
        x[0] + x[1] + x[2]
    }

    #[test]
    fn test_mpi_triple_integral() {
        let universe = mpi::initialize().unwrap();
        let comm = MpiComm::new(universe.world());
        comm.barrier().unwrap();

        let request =
            IntegrationRequest::new(3, vec![-2.0, -2.0, 0.0], vec![4.0, 6.0, 3.0], 100.0);
        let request = if comm.is_root() { Some(&request) } else { None };

        let config = HybridConfig {
            threads: Some(2),
            ..HybridConfig::default()
        };

        let result = hybrid::integrate(&comm, &integrand, request, &config).unwrap();

        if comm.is_root() {
            assert_eq!(result.round(), 648.0);
        } else {
            assert_eq!(result, 0.0);
        }
    }
}
