use wirefield::prelude::*;

fn main() -> Result<(), FieldError> {
    // Helmholtz pair of radius 10 cm, 10 turns each, 1 A.
    let mut wires = WireList::new();
    let winding = Winding::new(90, Orientation::new(Axis::Z), 1.0);
    helmholtz(&mut wires, vector(0.0, 0.0, 0.0), 0.1, 0.001, 10.0, &winding)?;

    // Axial profile from -10 cm to 10 cm.
    let axis = Grid::segment(21, vector(0.0, 0.0, -0.1), vector(0.0, 0.0, 0.1), &wires)?;
    let centre = MagneticField::from_vector(wires.field_at(&R3::zeros()));

    println!("z(m), Bz(T), Bz/Bz(0)");
    for (p, f) in axis.points().iter().zip(axis.fields()) {
        println!("{:.3e}, {:.6e}, {:.6}", p.z, f.z, f.z / centre.vector().z);
    }

    // Mid-plane map for ParaView.
    let plane = Grid::surface(41, 41, vector(0.0, 0.0, 0.0), 0.2, 0.2, Axis::Y, &wires)?;
    plane.write_vtk("helmholtz_xz.vtk", "Helmholtz pair, xz plane")?;
    println!("centre field: {centre}");
    Ok(())
}
