use batch_doe::{
    explore, ExplorationConfig, ExplorationMethod, Factorial, Lhs, LhsKind, Morris,
    ParameterDimension, ParameterType, Point, Random, Saltelli, SamplingMethod,
};
use jiff::civil::date;

fn main() -> batch_doe::Result<()> {
    env_logger::init();

    let dims = [
        ParameterDimension::float("speed", 0., 1.),
        ParameterDimension::int("agents", -10, 10),
        ParameterDimension::among("color", ParameterType::String, ["red", "green", "blue"]),
        ParameterDimension::date(
            "start",
            date(2024, 1, 1).at(0, 0, 0, 0),
            date(2024, 12, 31).at(0, 0, 0, 0),
        ),
        ParameterDimension::point2d("home", Point::new(0., 0.), Point::new(100., 50.)),
    ];
    let n = 5;

    println!("Take {n} samples in");
    for dim in &dims {
        println!("  {} : {}", dim.name(), dim.ptype());
    }
    println!();

    let print = |title: &str, points: Vec<batch_doe::DesignPoint>| {
        println!("*** using {title}");
        for p in points {
            let values: Vec<_> = p.iter().map(|(k, v)| format!("{k}={v}")).collect();
            println!("{}", values.join(", "));
        }
        println!();
    };

    print("random sampling", Random::new(&dims).sample(n)?);
    print("factorial sampling", Factorial::new(&dims).sample_levels(&[2, 2, 3, 1, 1])?);
    print(
        "centered latin hypercube sampling",
        Lhs::new(&dims).kind(LhsKind::Centered).sample(n)?,
    );
    print("maximin latin hypercube sampling", Lhs::new(&dims).kind(LhsKind::Maximin).sample(n)?);
    print("morris trajectories", Morris::new(&dims).levels(4).sample(2)?);
    print("saltelli sampling", Saltelli::new(&dims[..2]).sample(2)?);
    print(
        "exhaustive exploration",
        explore(&ExplorationConfig::new(ExplorationMethod::Exhaustive), &dims[1..3])?,
    );
    Ok(())
}
