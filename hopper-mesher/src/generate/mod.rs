mod grid_3d;
