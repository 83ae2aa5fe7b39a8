use simpsonir::callbacks::SimpleCallback;
use simpsonir::{integrate_with, Config, Estimate, Result};

type Func = fn(&[f64]) -> f64;

fn func_1(x: &[f64]) -> f64 {
    x[0] * x[0] - 2.0 * x[1]
}

fn func_2(x: &[f64]) -> f64 {
    (2.0 * x[0] * x[0]).log10() + x[2].sqrt() + 5.0 * x[1]
}

fn func_3(x: &[f64]) -> f64 {
    x[0] * x[1] * x[2]
}

fn func_4(x: &[f64]) -> f64 {
    x[0].exp() - 10.0_f64.sqrt() * 5.0 * x[1].sin() + (-2.0 * x[2] * x[2]).cos()
}

fn func_5(x: &[f64]) -> f64 {
    x[0].exp() + 2.0_f64.sqrt() * (x[1] * x[2]).sin() + (x[2] * x[2]).cos()
}

/// Integrates `f` sequentially and in parallel and prints both results and timings.
fn compare(name: &str, f: Func, domain: &[(f64, f64)], subdivisions: &[usize]) -> Result<()> {
    let callback = SimpleCallback {};

    println!("{} with subdivisions {:?}", name, subdivisions);

    let sequential: Estimate<f64> =
        integrate_with(&f, domain, subdivisions, &Config::sequential(), &callback)?;
    let parallel: Estimate<f64> =
        integrate_with(&f, domain, subdivisions, &Config::parallel(), &callback)?;

    let speedup = sequential.elapsed().as_secs_f64() / parallel.elapsed().as_secs_f64();
    println!(
        "difference: {:e}, speedup: {:.2}\n",
        (sequential.value() - parallel.value()).abs(),
        speedup
    );

    Ok(())
}

fn main() -> Result<()> {
    let cases: [(&str, Func, Vec<(f64, f64)>); 5] = [
        ("func_1", func_1, vec![(4.0, 10.0), (1.0, 2.0)]),
        ("func_2", func_2, vec![(4.0, 10.0), (1.0, 2.0), (2.0, 5.0)]),
        ("func_3", func_3, vec![(4.0, 10.0), (1.0, 2.0), (4.0, 5.0)]),
        ("func_4", func_4, vec![(4.0, 10.0), (1.0, 2.0), (0.0, 5.0)]),
        ("func_5", func_5, vec![(1.0, 10.0), (1.0, 3.0), (0.0, 6.0)]),
    ];

    for &n in &[2_usize, 16, 64] {
        for (name, f, domain) in &cases {
            compare(name, *f, domain, &vec![n; domain.len()])?;
        }
    }

    Ok(())
}
