/////////////////////////////////////////////////////////////////////////////////////////////
//
// Driver executable comparing accelerated dipole field summation against the direct sum.
//
// Created on: 22 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use ferreus_dipole::{DipoleTree, FieldQuantity, TreeParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

struct Config {
    num_particles: usize,
    ncrit: usize,
    theta: f64,
    maxorder: usize,
    accel_type: usize,
}

fn parse_args(args: &[String]) -> Option<Config> {
    if args.len() < 5 || args.len() > 6 {
        return None;
    }
    let config = Config {
        num_particles: args[1].parse().ok()?,
        ncrit: args[2].parse().ok()?,
        theta: args[3].parse().ok()?,
        maxorder: args[4].parse().ok()?,
        accel_type: match args.get(5) {
            Some(value) => value.parse().ok()?,
            None => 0,
        },
    };
    if config.accel_type > 1 {
        return None;
    }
    Some(config)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let config = match parse_args(&args) {
        Some(config) => config,
        None => {
            let program = args.first().map(String::as_str).unwrap_or("scaling");
            eprintln!("usage: {} Nparticles ncrit theta maxorder [type]", program);
            eprintln!("       type 0 = FMM (default), type 1 = Barnes-Hut");
            return ExitCode::from(2);
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), String> {
    println!("Scaling Test Parameters");
    println!("-----------------------");
    println!("Nparticles = {}", config.num_particles);
    println!("ncrit      = {}", config.ncrit);
    println!("theta      = {}", config.theta);
    println!("maxorder   = {}", config.maxorder);

    // Seeded uniform cloud with unit dipole moments
    let mut rng = StdRng::seed_from_u64(0);
    let mut positions = Vec::with_capacity(3 * config.num_particles);
    let mut moments = Vec::with_capacity(3 * config.num_particles);
    for _ in 0..config.num_particles {
        let mu = [
            rng.random_range(-1.0..1.0f64),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ];
        let norm = (mu[0] * mu[0] + mu[1] * mu[1] + mu[2] * mu[2]).sqrt();
        for component in mu {
            moments.push(component / norm);
        }
        for _ in 0..3 {
            positions.push(rng.random_range(-1.0..1.0));
        }
    }

    let mut field_exact = vec![0.0; config.num_particles];
    let mut field_approx = vec![0.0; config.num_particles];
    let mut t_direct = 0.0;

    for order in 2..config.maxorder {
        let params = TreeParams {
            ncrit: config.ncrit,
            order,
            theta: config.theta,
            quantity: FieldQuantity::Potential,
            root: None,
        };
        let mut tree =
            DipoleTree::new(&positions, &moments, params).map_err(|err| err.to_string())?;
        println!("Tree built with {} cells.", tree.num_cells());
        println!("Order {}\n-------", order);

        if order == 2 {
            let timer = Instant::now();
            tree.compute_field_exact(&mut field_exact);
            t_direct = timer.elapsed().as_secs_f64();
            println!("t_direct = {}", t_direct);
        }

        let timer = Instant::now();
        match config.accel_type {
            0 => tree.compute_field_fmm(&mut field_approx),
            _ => tree.compute_field_bh(&mut field_approx),
        }
        let t_approx = timer.elapsed().as_secs_f64();

        let filename = format!(
            "errors_lazy_p_{}_n_{}_ncrit_{}_theta_{:.6}_type_{}.txt",
            order, config.num_particles, config.ncrit, config.theta, config.accel_type
        );
        let file = File::create(&filename)
            .map_err(|err| format!("creating {}: {}", filename, err))?;
        let mut writer = BufWriter::new(file);

        let mut mean_relative_error = 0.0;
        for i in 0..config.num_particles {
            let error = (field_exact[i] - field_approx[i]) / field_exact[i];
            writeln!(writer, "{}", error).map_err(|err| format!("writing {}: {}", filename, err))?;
            mean_relative_error += error.abs();
        }
        mean_relative_error /= config.num_particles as f64;
        writer
            .flush()
            .map_err(|err| format!("flushing {}: {}", filename, err))?;
        eprintln!("Rel errs = {:e}", mean_relative_error);

        println!("Approx. calculation  = {} seconds.", t_approx);
        println!("{:10.4}% of direct time.", t_approx / t_direct * 100.0);
    }

    Ok(())
}
