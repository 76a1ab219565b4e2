use mpintir::callbacks::SimpleCallback;
use mpintir::integrators::midpoint::{integrate_refinements, Traversal};
use mpintir::IntegrationRequest;

fn main() -> mpintir::Result<()> {
    env_logger::init();

    // the second coordinate is a fixed parameter of the integrand
    let request =
        IntegrationRequest::new(1, vec![-1.0], vec![5.0], 1.0).with_seed(vec![0.0, 3.0]);
    let integrand = |x: &[f64]| (-x[0] + x[1]).exp();

    let chkpts = integrate_refinements(
        &integrand,
        &request,
        num_cpus::get(),
        Traversal::default(),
        &[10.0, 100.0, 1012.0],
        &SimpleCallback {},
    )?;

    if let Some(last) = chkpts.last() {
        println!("integral: {}", last.estimate());
    }

    Ok(())
}
