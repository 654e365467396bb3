//! Bitmap plots of bootstrap results and log-log fits.
use crate::power_law::PowerLaw;
use crate::summary::KsSummary;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;

/// Sorted KS distances against trial number, with the rejected 5% filled red and the accepted 95% filled blue.
pub fn ks_test(summary: &KsSummary, title: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ks = summary.sorted();
    let five = summary.five_percent_index();
    let points: Vec<(f64, f64)> = ks.iter().enumerate().map(|(i, d)| (i as f64, *d)).collect();

    let mut ymax = ks.iter().cloned().fold(0.0, f64::max) * 1.05;
    if ymax <= 0.0 {
        ymax = 1.0;
    }
    let root = BitMapBackend::new(title, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.margin(10, 10, 10, 10);
    let mut chart = ChartBuilder::on(&root)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..ks.len() as f64, 0f64..ymax)?;

    chart
        .configure_mesh()
        .x_labels(5)
        .y_labels(5)
        .y_label_formatter(&|x| format!("{:.3}", x))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .x_desc("Trials")
        .y_desc("KS Distance")
        .draw()?;

    chart
        .draw_series(AreaSeries::new(
            points[five..].iter().cloned(),
            0.0,
            &BLUE.mix(0.6),
        ))?
        .label("accepted 95%")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.filled()));
    chart
        .draw_series(AreaSeries::new(
            points[..five].iter().cloned(),
            0.0,
            &RED.mix(0.6),
        ))?
        .label("rejected 5%")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], RED.filled()));
    chart.draw_series(PointSeries::of_element(points, 2, &BLACK, &|c, s, st| {
        EmptyElement::at(c) + Circle::new((0, 0), s, st.filled())
    }))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.filled())
        .draw()?;
    root.present()?;
    Ok(())
}

/// Empirical ranks and their fitted power law on log-log axes.
///  - `support` and `ranks` are the event sizes and their normalized ranks, in matching order.
pub fn log_log(
    support: &[f64],
    ranks: &[f64],
    law: &PowerLaw,
    title: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let obs: Vec<(f64, f64)> = support
        .iter()
        .zip(ranks)
        .map(|(x, r)| (x.log10(), r.log10()))
        .collect();
    let fit: Vec<(f64, f64)> = support
        .iter()
        .map(|x| (x.log10(), law.log_evaluate(*x)))
        .collect();

    let mut all = obs.clone();
    all.extend(fit.iter().cloned());
    let xmin = all.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let xmax = all.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let ymin = all.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let ymax = all.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if !(xmin < xmax && ymin < ymax) {
        return Err(Box::new(crate::errors::FitError::DegenerateFit));
    }

    let root = BitMapBackend::new(title, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.margin(10, 10, 10, 10);
    let mut chart = ChartBuilder::on(&root)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)?;

    chart
        .configure_mesh()
        .x_labels(5)
        .y_labels(5)
        .y_label_formatter(&|x| format!("{:.2}", x))
        .x_label_formatter(&|x| format!("{:.2}", x))
        .x_desc("log10 Size")
        .y_desc("log10 CDF")
        .draw()?;

    chart
        .draw_series(PointSeries::of_element(obs, 2, &BLACK, &|c, s, st| {
            EmptyElement::at(c) + Circle::new((0, 0), s, st.filled())
        }))?
        .label("observed")
        .legend(|(x, y)| Circle::new((x + 10, y), 2, BLACK.filled()));
    chart
        .draw_series(LineSeries::new(fit, &BLUE))?
        .label(format!("fit, exponent {:.3}", law.exponent))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(WHITE.filled())
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_log_needs_spread() {
        let law = PowerLaw::new(1.0, 1.0);
        assert!(log_log(&[2.0], &[1.0], &law, "unused.png").is_err());
    }
}
