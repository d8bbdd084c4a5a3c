use crate::{
    error::{Result, invalid_parameter},
    generators::{Params, check_dimensions, reject_origin},
    maze::{Carved, Marks, Maze, Mode},
};

/// An empty room: every internal link open, only the outer border is walled.
pub fn room(width: usize, height: usize, params: Params) -> Result<Carved> {
    if params.target.is_some() {
        return Err(invalid_parameter(
            "target",
            &"Some(..)",
            &"an empty room is always built from scratch",
        ));
    }
    reject_origin(params.origin, "an empty room has no starting cell")?;
    check_dimensions(width, height)?;
    Ok(Carved {
        maze: Maze::new(width, height, Mode::Room),
        visited: Marks::new(width, height, true),
    })
}
